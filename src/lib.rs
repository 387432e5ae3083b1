pub mod asr;
pub mod audio;
pub mod config;
pub mod conversation;
pub mod error;
pub mod http;
pub mod session;

pub use asr::{AsrClient, AsrEvent, AsrMonitor, ConnectionState, ConnectionStatus, RecognitionResult};
pub use audio::{
    AudioChunk, AudioInput, AudioSource, AudioSourceFactory, CaptureConfig, FileSource, MicSource,
    Speaker, WavAudio,
};
pub use config::Config;
pub use conversation::{
    Collaborators, ConversationEngine, ConversationState, ConversationTurn, Role,
};
pub use error::{BridgeError, Result};
pub use http::{create_router, AppState};
pub use session::{SessionConfig, SessionStats, TranscriptSegment, VoiceSession};
