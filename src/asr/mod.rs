//! Streaming recognition transport
//!
//! This module owns the persistent connection to the remote speech
//! service: connection lifecycle, the JSON configuration handshake,
//! binary audio framing, partial/final result parsing, and a passive
//! status monitor fed from the event stream.

pub mod client;
pub mod frame;
pub mod messages;
pub mod monitor;

pub use client::{AsrClient, AsrEvent, ConnectionState};
pub use frame::{decode_payload_len, encode_audio_frame, FRAME_HEADER_LEN, MAX_PAYLOAD_LEN};
pub use messages::{HandshakeMessage, RecognitionResult, ServerMessage, Utterance};
pub use monitor::{AsrMonitor, ConnectionStatus, MonitorSnapshot};
