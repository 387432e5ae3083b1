// Tests for the binary audio frame codec.
//
// The wire layout is a 4-byte header (version/compression flags, reserved
// byte, big-endian u16 payload length) followed by raw PCM bytes.

use voicebridge::asr::{decode_payload_len, encode_audio_frame, FRAME_HEADER_LEN, MAX_PAYLOAD_LEN};
use voicebridge::BridgeError;

#[test]
fn test_frame_header_layout() {
    let payload = [1u8, 2, 3];
    let frame = encode_audio_frame(&payload).unwrap();

    assert_eq!(frame.len(), FRAME_HEADER_LEN + payload.len());
    assert_eq!(frame[0], 0x10, "version 1, no compression");
    assert_eq!(frame[1], 0x00, "reserved byte");
    assert_eq!(frame[2], 0x00);
    assert_eq!(frame[3], 0x03);
    assert_eq!(&frame[4..], &payload);
}

#[test]
fn test_length_bytes_are_big_endian() {
    let payload = vec![0u8; 1024];
    let frame = encode_audio_frame(&payload).unwrap();

    // 1024 = 0x0400
    assert_eq!(frame[2], 0x04);
    assert_eq!(frame[3], 0x00);
    assert_eq!(
        u16::from_be_bytes([frame[2], frame[3]]) as usize,
        payload.len()
    );
}

#[test]
fn test_length_roundtrip() {
    // 100ms of 16kHz mono i16 audio
    let payload = vec![0u8; 3200];
    let frame = encode_audio_frame(&payload).unwrap();

    assert_eq!(frame.len(), payload.len() + FRAME_HEADER_LEN);
    assert_eq!(decode_payload_len(&frame), Some(3200));
}

#[test]
fn test_empty_payload() {
    let frame = encode_audio_frame(&[]).unwrap();

    assert_eq!(frame.len(), FRAME_HEADER_LEN);
    assert_eq!(decode_payload_len(&frame), Some(0));
}

#[test]
fn test_max_payload_accepted() {
    let payload = vec![0u8; MAX_PAYLOAD_LEN];
    let frame = encode_audio_frame(&payload).unwrap();

    assert_eq!(decode_payload_len(&frame), Some(MAX_PAYLOAD_LEN));
}

#[test]
fn test_oversized_payload_rejected() {
    let payload = vec![0u8; MAX_PAYLOAD_LEN + 1];
    let err = encode_audio_frame(&payload).unwrap_err();

    match err {
        BridgeError::FrameTooLarge { size } => assert_eq!(size, MAX_PAYLOAD_LEN + 1),
        other => panic!("Expected FrameTooLarge, got {:?}", other),
    }
}

#[test]
fn test_decode_rejects_short_slice() {
    assert_eq!(decode_payload_len(&[0x10, 0x00, 0x01]), None);
    assert_eq!(decode_payload_len(&[]), None);
}
