use crate::asr::frame::encode_audio_frame;
use crate::asr::messages::{EndOfUtterance, HandshakeMessage, RecognitionResult, ServerMessage};
use crate::config::SpeechConfig;
use crate::error::{BridgeError, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};
use uuid::Uuid;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Lifecycle of one streaming connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Notifications delivered while a connection is live
#[derive(Debug, Clone)]
pub enum AsrEvent {
    /// A recognition update parsed from an inbound message
    Result(RecognitionResult),
    /// A transport or parse error; parse errors leave the connection open
    Error(String),
    /// The remote closed the connection
    Closed,
}

/// Client for one streaming recognition session.
///
/// Owns the socket exclusively: the write half lives behind `send_audio_chunk`
/// and `disconnect`, the read half is drained by a spawned reader task that
/// forwards parsed results over the event channel. The client never
/// reconnects on its own; connection-level failures surface to the caller.
pub struct AsrClient {
    config: SpeechConfig,
    events: mpsc::Sender<AsrEvent>,
    sink: Arc<Mutex<Option<WsSink>>>,
    state: Arc<StdMutex<ConnectionState>>,
    connect_id: StdMutex<Option<String>>,
}

impl AsrClient {
    pub fn new(config: SpeechConfig, events: mpsc::Sender<AsrEvent>) -> Self {
        Self {
            config,
            events,
            sink: Arc::new(Mutex::new(None)),
            state: Arc::new(StdMutex::new(ConnectionState::Disconnected)),
            connect_id: StdMutex::new(None),
        }
    }

    /// Open the socket and perform the configuration handshake.
    ///
    /// Returns only after the initial configuration message has been sent.
    /// A previous connection, if any, is closed first. Errors before the
    /// handshake completes are reported both on the event channel and as
    /// the returned error.
    pub async fn connect(&self) -> Result<()> {
        self.disconnect().await;

        let connect_id = Uuid::new_v4().to_string();
        let url = format!(
            "{}?app_id={}&access_token={}&resource_id={}&connect_id={}",
            self.config.endpoint,
            self.config.app_id,
            self.config.access_token,
            self.config.resource_id,
            connect_id,
        );

        set_state(&self.state, ConnectionState::Connecting);
        info!("Connecting to speech service (connect_id={})", connect_id);

        let ws_stream = match connect_async(url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                set_state(&self.state, ConnectionState::Disconnected);
                return Err(self.connect_failed(e.to_string()).await);
            }
        };

        let (mut ws_tx, ws_rx) = ws_stream.split();

        let handshake = HandshakeMessage::new(&self.config.app_id, &self.config.user_id);
        let payload = serde_json::to_string(&handshake).map_err(|e| BridgeError::Parse {
            message: e.to_string(),
        })?;

        if let Err(e) = ws_tx.send(Message::Text(payload.into())).await {
            set_state(&self.state, ConnectionState::Disconnected);
            return Err(self.connect_failed(e.to_string()).await);
        }

        *self.sink.lock().await = Some(ws_tx);
        if let Ok(mut id) = self.connect_id.lock() {
            *id = Some(connect_id);
        }
        set_state(&self.state, ConnectionState::Open);
        info!("Speech service connected, handshake sent");

        self.spawn_reader(ws_rx);

        Ok(())
    }

    /// Send one audio chunk as a binary frame.
    ///
    /// When `is_last` is set, an `{"is_end": true}` text frame follows the
    /// binary frame to mark end of utterance. Fails with `NotConnected`
    /// before `connect` succeeds or after `disconnect`.
    pub async fn send_audio_chunk(&self, payload: &[u8], is_last: bool) -> Result<()> {
        let frame = encode_audio_frame(payload)?;

        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(BridgeError::NotConnected)?;

        if let Err(e) = sink.send(Message::Binary(frame.into())).await {
            warn!("Audio frame send failed: {}", e);
            guard.take();
            set_state(&self.state, ConnectionState::Closed);
            return Err(BridgeError::NotConnected);
        }

        if is_last {
            let sentinel =
                serde_json::to_string(&EndOfUtterance { is_end: true }).map_err(|e| {
                    BridgeError::Parse {
                        message: e.to_string(),
                    }
                })?;
            if let Err(e) = sink.send(Message::Text(sentinel.into())).await {
                warn!("End-of-utterance send failed: {}", e);
                guard.take();
                set_state(&self.state, ConnectionState::Closed);
                return Err(BridgeError::NotConnected);
            }
        }

        Ok(())
    }

    /// Close the connection. Safe to call repeatedly or before connecting;
    /// an in-flight reader task winds down when the socket closes.
    pub async fn disconnect(&self) {
        let mut guard = self.sink.lock().await;
        if let Some(mut sink) = guard.take() {
            set_state(&self.state, ConnectionState::Closing);
            if let Err(e) = sink.close().await {
                warn!("WebSocket close failed: {}", e);
            }
            set_state(&self.state, ConnectionState::Closed);
            info!("Speech service disconnected");
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(ConnectionState::Closed)
    }

    /// Session identifier of the current connection, if any
    pub fn connect_id(&self) -> Option<String> {
        self.connect_id.lock().ok().and_then(|id| id.clone())
    }

    async fn connect_failed(&self, message: String) -> BridgeError {
        let message = if message.is_empty() {
            "connection refused".to_string()
        } else {
            message
        };
        error!("Speech service connection failed: {}", message);
        let _ = self
            .events
            .send(AsrEvent::Error(format!(
                "WebSocket connection failed: {}",
                message
            )))
            .await;
        BridgeError::Connection { message }
    }

    fn spawn_reader(&self, mut ws_rx: SplitStream<WsStream>) {
        let events = self.events.clone();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            while let Some(msg) = ws_rx.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerMessage>(text.as_str()) {
                            Ok(server_msg) => {
                                if let Some(result) = server_msg.result {
                                    let result = RecognitionResult::from(result);
                                    let _ = events.send(AsrEvent::Result(result)).await;
                                }
                            }
                            Err(e) => {
                                // Malformed messages are reported but do not
                                // terminate the connection
                                warn!("Failed to parse service message: {}", e);
                                let _ = events
                                    .send(AsrEvent::Error(format!(
                                        "Failed to parse service message: {}",
                                        e
                                    )))
                                    .await;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("Speech service closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        let _ = events.send(AsrEvent::Error(e.to_string())).await;
                        break;
                    }
                }
            }
            set_state(&state, ConnectionState::Closed);
            // Exactly one Closed event per connection, however it ended
            let _ = events.send(AsrEvent::Closed).await;
        });
    }
}

fn set_state(state: &Arc<StdMutex<ConnectionState>>, next: ConnectionState) {
    if let Ok(mut s) = state.lock() {
        *s = next;
    }
}
