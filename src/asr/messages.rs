use serde::{Deserialize, Serialize};

/// Initial configuration message, sent as a text frame immediately after
/// the socket opens
#[derive(Debug, Serialize)]
pub struct HandshakeMessage {
    pub app_id: String,
    pub user_id: String,
    pub audio_format: String,
    pub sample_rate: u32,
    pub enable_punctuation: bool,
    pub enable_timestamp: bool,
    pub enable_word_timestamp: bool,
}

impl HandshakeMessage {
    pub fn new(app_id: &str, user_id: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            user_id: user_id.to_string(),
            audio_format: "wav".to_string(),
            sample_rate: 16000,
            enable_punctuation: true,
            enable_timestamp: true,
            enable_word_timestamp: true,
        }
    }
}

/// End-of-utterance sentinel, sent as a separate text frame after the
/// final binary audio frame
#[derive(Debug, Serialize)]
pub struct EndOfUtterance {
    pub is_end: bool,
}

/// Inbound message from the recognition service
#[derive(Debug, Deserialize)]
pub struct ServerMessage {
    pub audio_info: Option<AudioInfo>,
    pub result: Option<ServerResult>,
}

#[derive(Debug, Deserialize)]
pub struct AudioInfo {
    /// Processed audio duration in milliseconds
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
pub struct ServerResult {
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub utterances: Vec<Utterance>,
}

/// A bounded span of recognized speech; `definite` marks spans the
/// service will not revise further
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub definite: bool,
    pub start_time: u64,
    pub end_time: u64,
    pub text: String,
}

/// One recognition update, parsed from an inbound message
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    pub text: String,
    /// True iff no utterance is still marked non-definite
    pub is_final: bool,
    pub confidence: Option<f32>,
    pub utterances: Vec<Utterance>,
}

impl From<ServerResult> for RecognitionResult {
    fn from(result: ServerResult) -> Self {
        let is_final = !result.utterances.iter().any(|u| !u.definite);
        Self {
            text: result.text,
            is_final,
            confidence: result.confidence,
            utterances: result.utterances,
        }
    }
}
