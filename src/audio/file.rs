use super::convert::to_target_format;
use super::source::{AudioChunk, AudioSource, CaptureConfig};
use anyhow::{Context, Result};
use hound::WavReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Decoded 16-bit WAV audio
pub struct WavAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
    pub duration_seconds: f64,
}

impl WavAudio {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
        Self::from_reader(reader)
    }

    /// Decode WAV data held in memory (e.g. synthesized speech)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Failed to decode WAV data")?;
        Self::from_reader(reader)
    }

    fn from_reader<R: std::io::Read>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
            duration_seconds,
        })
    }
}

/// Replays a WAV file as fixed-cadence capture chunks.
///
/// Fills in for the microphone in tests and batch runs; the emission
/// timing matches the live source so downstream behavior is identical.
pub struct FileSource {
    path: PathBuf,
    config: CaptureConfig,
    capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, config: CaptureConfig) -> Result<Self> {
        let path = path.into();
        anyhow::ensure!(path.exists(), "Audio file not found: {}", path.display());
        Ok(Self {
            path,
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        })
    }
}

#[async_trait::async_trait]
impl AudioSource for FileSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        let audio = WavAudio::open(&self.path)?;
        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels",
            audio.duration_seconds, audio.sample_rate, audio.channels
        );

        let samples = to_target_format(
            audio.samples,
            audio.sample_rate,
            audio.channels,
            self.config.sample_rate,
            self.config.channels,
        );

        let (tx, rx) = mpsc::channel(100);
        self.capturing.store(true, Ordering::SeqCst);
        let capturing = Arc::clone(&self.capturing);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            let samples_per_chunk = config.samples_per_chunk();
            let mut interval =
                tokio::time::interval(std::time::Duration::from_millis(config.chunk_interval_ms));
            let mut timestamp_ms = 0u64;

            for chunk_samples in samples.chunks(samples_per_chunk) {
                interval.tick().await;
                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                let chunk = AudioChunk {
                    samples: chunk_samples.to_vec(),
                    sample_rate: config.sample_rate,
                    channels: config.channels,
                    timestamp_ms,
                };
                timestamp_ms += config.chunk_interval_ms;

                if tx.send(chunk).await.is_err() {
                    break;
                }
            }
            capturing.store(false, Ordering::SeqCst);
        });
        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
