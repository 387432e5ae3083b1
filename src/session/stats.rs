use crate::asr::ConnectionStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Statistics about a streaming session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Whether the session is currently active
    pub is_active: bool,

    /// Connection status as shown on the monitor surface
    pub status: ConnectionStatus,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Number of audio chunks sent to the recognition service
    pub chunks_sent: usize,

    /// Number of recognition results received
    pub results_received: usize,

    /// Latest recognized text
    pub last_text: String,

    /// Last error message, cleared by a successful reconnect
    pub last_error: Option<String>,
}

/// A single recognition update received during the session
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptSegment {
    /// Recognized text
    pub text: String,

    /// When this update was received
    pub timestamp: DateTime<Utc>,

    /// Confidence score (0.0 to 1.0), if reported
    pub confidence: Option<f32>,

    /// Whether the service considers this text final
    pub is_final: bool,
}
