use crate::audio::AudioInput;

/// Configuration for a streaming session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Where the audio comes from (microphone or WAV file)
    pub source: AudioInput,

    /// Sample rate for audio processing (the recognition service expects 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono)
    pub channels: u16,

    /// Chunk emission cadence in milliseconds
    pub chunk_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            source: AudioInput::Microphone,
            sample_rate: 16000,
            channels: 1,
            chunk_interval_ms: 100,
        }
    }
}
