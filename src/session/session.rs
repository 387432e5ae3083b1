use super::config::SessionConfig;
use super::stats::{SessionStats, TranscriptSegment};
use crate::asr::{AsrClient, AsrEvent, AsrMonitor};
use crate::audio::{AudioSourceFactory, CaptureConfig};
use crate::config::SpeechConfig;
use crate::conversation::{Collaborators, ConversationEngine, ConversationTurn};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A streaming session that manages audio capture, frame transmission to
/// the recognition service, recognition event collection, and (when
/// collaborators are injected) the conversation turn-taking loop.
pub struct VoiceSession {
    /// Session configuration
    config: SessionConfig,

    /// Transport client for the recognition service
    client: Arc<AsrClient>,

    /// Passive connection/status observer
    monitor: Arc<Mutex<AsrMonitor>>,

    /// Conversation engine, present when collaborators were injected
    engine: Option<Arc<ConversationEngine>>,

    /// Accumulated recognition updates
    transcripts: Arc<Mutex<Vec<TranscriptSegment>>>,

    /// When the session was created
    started_at: chrono::DateTime<chrono::Utc>,

    /// Whether the session is currently active
    active: Arc<AtomicBool>,

    /// Number of audio chunks sent
    chunks_sent: Arc<AtomicUsize>,

    /// Number of recognition results received
    results_received: Arc<AtomicUsize>,

    /// Receiver side of the transport event channel, consumed on start
    event_rx: Mutex<Option<mpsc::Receiver<AsrEvent>>>,

    /// Handle for the capture/send task
    capture_task: Mutex<Option<JoinHandle<()>>>,

    /// Handle for the event-consuming task
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl VoiceSession {
    pub fn new(config: SessionConfig, speech: SpeechConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(64);
        let client = Arc::new(AsrClient::new(speech, event_tx));

        Self {
            config,
            client,
            monitor: Arc::new(Mutex::new(AsrMonitor::new())),
            engine: None,
            transcripts: Arc::new(Mutex::new(Vec::new())),
            started_at: Utc::now(),
            active: Arc::new(AtomicBool::new(false)),
            chunks_sent: Arc::new(AtomicUsize::new(0)),
            results_received: Arc::new(AtomicUsize::new(0)),
            event_rx: Mutex::new(Some(event_rx)),
            capture_task: Mutex::new(None),
            event_task: Mutex::new(None),
        }
    }

    /// Attach a conversation engine so captured chunks also drive the
    /// turn-taking loop
    pub fn with_conversation(mut self, collaborators: Collaborators, context: &str) -> Self {
        self.engine = Some(Arc::new(ConversationEngine::new(collaborators, context)));
        self
    }

    /// Connect to the recognition service and start streaming audio
    pub async fn start(&self) -> Result<()> {
        if self.active.load(Ordering::SeqCst) {
            warn!("Session {} already started", self.config.session_id);
            return Ok(());
        }

        info!("Starting session: {}", self.config.session_id);

        // Consume transport events from before the connect attempt onward
        // so connection errors reach the monitor
        let event_rx = self
            .event_rx
            .lock()
            .await
            .take()
            .context("Session already consumed its event stream")?;
        self.spawn_event_task(event_rx).await;

        self.monitor.lock().await.on_connecting();
        if let Err(e) = self.client.connect().await {
            self.monitor
                .lock()
                .await
                .on_event(&AsrEvent::Error(e.to_string()));
            // Without a connection the event task has nothing to consume
            if let Some(task) = self.event_task.lock().await.take() {
                task.abort();
            }
            return Err(e).context("Failed to connect to the recognition service");
        }
        self.monitor.lock().await.on_connected();

        self.active.store(true, Ordering::SeqCst);

        let capture_config = CaptureConfig {
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
            chunk_interval_ms: self.config.chunk_interval_ms,
        };
        let mut source = AudioSourceFactory::create(self.config.source.clone(), capture_config)
            .context("Failed to create audio source")?;
        let mut chunk_rx = source
            .start()
            .await
            .context("Failed to start audio capture")?;

        let client = Arc::clone(&self.client);
        let engine = self.engine.clone();
        let active = Arc::clone(&self.active);
        let chunks_sent = Arc::clone(&self.chunks_sent);

        let capture_task = tokio::spawn(async move {
            info!("Capture task started");

            while let Some(chunk) = chunk_rx.recv().await {
                if !active.load(Ordering::SeqCst) {
                    break;
                }

                let pcm = chunk.to_pcm_bytes();
                if let Err(e) = client.send_audio_chunk(&pcm, false).await {
                    error!("Failed to send audio frame: {}", e);
                    break;
                }
                chunks_sent.fetch_add(1, Ordering::SeqCst);

                if let Some(engine) = &engine {
                    if let Err(e) = engine.submit_chunk(pcm).await {
                        error!("Failed to queue chunk for conversation: {}", e);
                    }
                }
            }

            info!("Capture task stopped");

            // Mark end of utterance so the service finalizes pending results
            if let Err(e) = client.send_audio_chunk(&[], true).await {
                warn!("Failed to send end-of-utterance marker: {}", e);
            }

            if let Err(e) = source.stop().await {
                error!("Failed to stop audio source: {}", e);
            }
        });

        {
            let mut handle = self.capture_task.lock().await;
            *handle = Some(capture_task);
        }

        info!("Session started successfully: {}", self.config.session_id);

        Ok(())
    }

    /// Stop streaming and disconnect
    pub async fn stop(&self) -> Result<SessionStats> {
        if !self.active.load(Ordering::SeqCst) {
            warn!("Session {} not active", self.config.session_id);
            return Ok(self.stats().await);
        }

        info!("Stopping session: {}", self.config.session_id);

        self.active.store(false, Ordering::SeqCst);

        {
            let mut handle = self.capture_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Capture task panicked: {}", e);
                }
            }
        }

        if let Some(engine) = &self.engine {
            engine.stop().await;
        }

        self.client.disconnect().await;

        {
            let mut handle = self.event_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Event task panicked: {}", e);
                }
            }
        }

        info!("Session stopped: {}", self.config.session_id);

        Ok(self.stats().await)
    }

    /// Current session statistics, combining counters with the monitor view
    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        let monitor = self.monitor.lock().await;

        SessionStats {
            is_active: self.active.load(Ordering::SeqCst),
            status: monitor.status(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            chunks_sent: self.chunks_sent.load(Ordering::SeqCst),
            results_received: self.results_received.load(Ordering::SeqCst),
            last_text: monitor.last_text().to_string(),
            last_error: monitor.last_error().map(|e| e.to_string()),
        }
    }

    /// Accumulated recognition updates
    pub async fn transcript(&self) -> Vec<TranscriptSegment> {
        self.transcripts.lock().await.clone()
    }

    /// Conversation history, empty when no collaborators were injected
    pub async fn history(&self) -> Vec<ConversationTurn> {
        match &self.engine {
            Some(engine) => engine.history().await,
            None => Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    async fn spawn_event_task(&self, mut event_rx: mpsc::Receiver<AsrEvent>) {
        let monitor = Arc::clone(&self.monitor);
        let transcripts = Arc::clone(&self.transcripts);
        let results_received = Arc::clone(&self.results_received);

        let event_task = tokio::spawn(async move {
            info!("Event task started");

            while let Some(event) = event_rx.recv().await {
                monitor.lock().await.on_event(&event);

                match event {
                    AsrEvent::Result(result) => {
                        results_received.fetch_add(1, Ordering::SeqCst);
                        let segment = TranscriptSegment {
                            text: result.text,
                            timestamp: Utc::now(),
                            confidence: result.confidence,
                            is_final: result.is_final,
                        };
                        transcripts.lock().await.push(segment);
                    }
                    AsrEvent::Error(_) => {}
                    AsrEvent::Closed => break,
                }
            }

            info!("Event task stopped");
        });

        let mut handle = self.event_task.lock().await;
        *handle = Some(event_task);
    }
}
