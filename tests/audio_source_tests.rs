// Integration tests for the file-backed capture source and the sample
// conversion helpers.

use std::time::Duration;
use tempfile::TempDir;
use voicebridge::audio::convert::{resample, stereo_to_mono};
use voicebridge::audio::source::AudioSource;
use voicebridge::audio::{AudioChunk, CaptureConfig, FileSource, Speaker, WavAudio};
use voicebridge::conversation::{AudioSink, SynthesizedAudio};
use voicebridge::BridgeError;

/// Write a WAV file with the given spec and a simple ramp signal
fn write_wav(path: &std::path::Path, sample_rate: u32, channels: u16, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        for _ in 0..channels {
            writer.write_sample((i % 100) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}

async fn collect_chunks(mut rx: tokio::sync::mpsc::Receiver<AudioChunk>) -> Vec<AudioChunk> {
    let mut chunks = Vec::new();
    while let Ok(Some(chunk)) =
        tokio::time::timeout(Duration::from_secs(5), rx.recv()).await
    {
        chunks.push(chunk);
    }
    chunks
}

#[tokio::test]
async fn test_file_source_emits_fixed_cadence_chunks() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("one-second.wav");
    // 1 second of 16kHz mono
    write_wav(&path, 16000, 1, 16000);

    let mut source = FileSource::new(&path, CaptureConfig::default()).unwrap();
    let rx = source.start().await.unwrap();
    let chunks = collect_chunks(rx).await;

    // 100ms chunks at 16kHz mono = 1600 samples each, 10 chunks total
    assert_eq!(chunks.len(), 10);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.samples.len(), 1600, "chunk {} size", i);
        assert_eq!(chunk.sample_rate, 16000);
        assert_eq!(chunk.channels, 1);
        assert_eq!(chunk.timestamp_ms, i as u64 * 100);
    }

    assert!(!source.is_capturing(), "source drains once the file ends");
    source.stop().await.unwrap();
}

#[tokio::test]
async fn test_file_source_converts_to_target_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stereo-32k.wav");
    // 1 second of 32kHz stereo
    write_wav(&path, 32000, 2, 32000);

    let mut source = FileSource::new(&path, CaptureConfig::default()).unwrap();
    let rx = source.start().await.unwrap();
    let chunks = collect_chunks(rx).await;

    // Mixed to mono and resampled to 16kHz: 1 second = 10 chunks of 1600
    let total: usize = chunks.iter().map(|c| c.samples.len()).sum();
    assert_eq!(total, 16000);
    assert!(chunks.iter().all(|c| c.sample_rate == 16000 && c.channels == 1));

    source.stop().await.unwrap();
}

#[test]
fn test_file_source_rejects_missing_file() {
    assert!(FileSource::new("/nonexistent/audio.wav", CaptureConfig::default()).is_err());
}

#[test]
fn test_pcm_bytes_are_little_endian() {
    let chunk = AudioChunk {
        samples: vec![100, -200],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: 0,
    };
    let bytes = chunk.to_pcm_bytes();
    assert_eq!(bytes.len(), 4);
    assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 100);
    assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), -200);
}

#[test]
fn test_stereo_to_mono_sums_channels() {
    let mono = stereo_to_mono(&[100, 200, -50, -100, i16::MAX, i16::MAX]);
    assert_eq!(mono[0], 300);
    assert_eq!(mono[1], -150);
    assert_eq!(mono[2], i16::MAX, "saturates instead of wrapping");
}

#[test]
fn test_resample_halves_and_preserves_rate_match() {
    let samples: Vec<i16> = (0..1000).map(|i| i as i16).collect();

    let down = resample(&samples, 32000, 16000);
    assert_eq!(down.len(), 500);
    assert_eq!(down[0], 0);
    assert_eq!(down[1], 2);

    let same = resample(&samples, 16000, 16000);
    assert_eq!(same, samples);
}

#[tokio::test]
async fn test_speaker_rejects_undecodable_audio() {
    let speaker = Speaker::new();
    let audio = SynthesizedAudio {
        audio: vec![1, 2, 3],
        duration_seconds: 0.0,
    };

    let err = speaker.play(&audio).await.unwrap_err();
    assert!(matches!(err, BridgeError::Playback { .. }));
}

#[test]
fn test_synthesized_audio_measures_duration_from_wav() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("reply.wav");
    // 250ms of 16kHz mono
    write_wav(&path, 16000, 1, 4000);

    let bytes = std::fs::read(&path).unwrap();
    let synthesized = SynthesizedAudio::from_wav(bytes).unwrap();
    assert!((synthesized.duration_seconds - 0.25).abs() < 1e-9);

    let err = SynthesizedAudio::from_wav(vec![0u8; 8]).unwrap_err();
    assert!(matches!(err, BridgeError::Synthesis { .. }));
}

#[test]
fn test_wav_audio_duration_from_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("duration.wav");
    // 500ms of 16kHz mono
    write_wav(&path, 16000, 1, 8000);

    let bytes = std::fs::read(&path).unwrap();
    let audio = WavAudio::from_bytes(&bytes).unwrap();

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert!((audio.duration_seconds - 0.5).abs() < 1e-9);
}
