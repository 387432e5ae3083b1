//! Binary audio frame codec for the streaming recognition protocol.
//!
//! Each outbound audio frame is a 4-byte header followed by raw PCM:
//! byte 0 carries the protocol version and compression flags (0x10 =
//! version 1, no compression), byte 1 is reserved, bytes 2-3 hold the
//! payload length as a big-endian u16.

use crate::error::{BridgeError, Result};

/// Header length in bytes
pub const FRAME_HEADER_LEN: usize = 4;

/// Version 1 in the high nibble, no compression in the low nibble
pub const PROTOCOL_FLAGS: u8 = 0x10;

/// Largest payload the two length bytes can describe
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Encode one audio chunk into a wire frame (header + payload).
///
/// Payloads larger than [`MAX_PAYLOAD_LEN`] are rejected rather than
/// truncated; at the 100ms capture cadence a chunk is 3200 bytes, far
/// below the limit.
pub fn encode_audio_frame(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(BridgeError::FrameTooLarge {
            size: payload.len(),
        });
    }

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.push(PROTOCOL_FLAGS);
    frame.push(0x00);
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(payload);

    Ok(frame)
}

/// Read the payload length from an encoded frame's header.
///
/// Returns `None` if the slice is shorter than the header.
pub fn decode_payload_len(frame: &[u8]) -> Option<usize> {
    if frame.len() < FRAME_HEADER_LEN {
        return None;
    }
    Some(u16::from_be_bytes([frame[2], frame[3]]) as usize)
}
