use crate::asr::client::AsrEvent;
use serde::Serialize;

/// User-visible connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Idle,
    Connecting,
    Active,
    Error,
}

/// Passive observer of a streaming session: tracks the connection status,
/// the latest recognized text, and the last error. Holds no business
/// logic; it is fed lifecycle calls and `AsrEvent`s and only records them.
#[derive(Debug)]
pub struct AsrMonitor {
    status: ConnectionStatus,
    last_text: String,
    last_error: Option<String>,
}

/// Serializable view of the monitor for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub status: ConnectionStatus,
    pub last_text: String,
    pub last_error: Option<String>,
}

impl AsrMonitor {
    pub fn new() -> Self {
        Self {
            status: ConnectionStatus::Idle,
            last_text: String::new(),
            last_error: None,
        }
    }

    pub fn on_connecting(&mut self) {
        self.status = ConnectionStatus::Connecting;
    }

    /// A successful (re)connect clears any previous error
    pub fn on_connected(&mut self) {
        self.status = ConnectionStatus::Active;
        self.last_error = None;
    }

    pub fn on_event(&mut self, event: &AsrEvent) {
        match event {
            AsrEvent::Result(result) => {
                self.last_text = result.text.clone();
            }
            AsrEvent::Error(message) => {
                self.status = ConnectionStatus::Error;
                self.last_error = Some(message.clone());
            }
            AsrEvent::Closed => {
                if self.status != ConnectionStatus::Error {
                    self.status = ConnectionStatus::Idle;
                }
            }
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            status: self.status,
            last_text: self.last_text.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

impl Default for AsrMonitor {
    fn default() -> Self {
        Self::new()
    }
}
