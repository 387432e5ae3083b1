use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// One chunk of captured audio (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Raw audio samples (i16 PCM)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Offset in milliseconds since capture started
    pub timestamp_ms: u64,
}

impl AudioChunk {
    /// Flatten the samples to little-endian PCM bytes for transmission
    pub fn to_pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Configuration for audio capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (input is resampled if needed)
    pub sample_rate: u32,
    /// Target channel count (1 = mono)
    pub channels: u16,
    /// Chunk emission cadence in milliseconds
    pub chunk_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // what the recognition service expects
            channels: 1,        // Mono
            chunk_interval_ms: 100,
        }
    }
}

impl CaptureConfig {
    /// Samples per emitted chunk at the configured rate and cadence
    pub fn samples_per_chunk(&self) -> usize {
        (self.sample_rate as u64 * self.chunk_interval_ms / 1000) as usize
            * self.channels as usize
    }
}

/// Audio capture source trait
///
/// Implementations:
/// - Microphone: cpal input stream on the default device
/// - File: WAV file replayed on the capture cadence (tests/batch runs)
#[async_trait::async_trait]
pub trait AudioSource: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive fixed-cadence chunks
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if the source is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Audio input selector
#[derive(Debug, Clone)]
pub enum AudioInput {
    /// Default microphone
    Microphone,
    /// WAV file input (for testing/batch processing)
    File(PathBuf),
}

/// Audio source factory
pub struct AudioSourceFactory;

impl AudioSourceFactory {
    pub fn create(input: AudioInput, config: CaptureConfig) -> Result<Box<dyn AudioSource>> {
        match input {
            AudioInput::Microphone => Ok(Box::new(super::mic::MicSource::new(config))),
            AudioInput::File(path) => Ok(Box::new(super::file::FileSource::new(path, config)?)),
        }
    }
}
