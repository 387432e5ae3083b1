//! Error types for voicebridge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    // Transport errors
    #[error("WebSocket connection failed: {message}")]
    Connection { message: String },

    #[error("Not connected to the speech service")]
    NotConnected,

    #[error("Audio frame payload too large: {size} bytes (limit 65535)")]
    FrameTooLarge { size: usize },

    #[error("Failed to parse service message: {message}")]
    Parse { message: String },

    // Turn pipeline errors
    #[error("Speech recognition failed: {message}")]
    Recognition { message: String },

    #[error("Dialogue generation failed: {message}")]
    Dialogue { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    #[error("Audio playback failed: {message}")]
    Playback { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, BridgeError>;
