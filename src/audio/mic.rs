//! Microphone capture via cpal.
//!
//! The cpal stream is not `Send`, so it lives on a dedicated capture
//! thread; the data callback accumulates samples into a shared buffer and
//! the thread slices them into fixed-cadence chunks for the channel.

use super::convert::to_target_format;
use super::source::{AudioChunk, AudioSource, CaptureConfig};
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub struct MicSource {
    config: CaptureConfig,
    capturing: Arc<AtomicBool>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl MicSource {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioSource for MicSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        let (tx, rx) = mpsc::channel(100);

        self.capturing.store(true, Ordering::SeqCst);
        let capturing = Arc::clone(&self.capturing);
        let config = self.config.clone();

        let worker = std::thread::spawn(move || {
            if let Err(e) = run_capture(config, tx, capturing) {
                error!("Microphone capture failed: {}", e);
            }
        });
        self.worker = Some(worker);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Capture thread panicked");
            }
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

fn run_capture(
    config: CaptureConfig,
    tx: mpsc::Sender<AudioChunk>,
    capturing: Arc<AtomicBool>,
) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    let device_config = device
        .default_input_config()
        .context("Failed to query default input config")?;
    let device_rate = device_config.sample_rate();
    let device_channels = device_config.channels();
    let stream_config: cpal::StreamConfig = device_config.config();

    info!(
        "Capturing from {:?} at {}Hz, {} channels ({:?})",
        device.name().unwrap_or_else(|_| "unknown".to_string()),
        device_rate,
        device_channels,
        device_config.sample_format(),
    );

    let buffer: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));
    let err_callback = |err| {
        warn!("Audio stream error: {}", err);
    };

    let stream = match device_config.sample_format() {
        cpal::SampleFormat::I16 => {
            let buf = Arc::clone(&buffer);
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut b) = buf.lock() {
                        b.extend_from_slice(data);
                    }
                },
                err_callback,
                None,
            )?
        }
        cpal::SampleFormat::F32 => {
            let buf = Arc::clone(&buffer);
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut b) = buf.lock() {
                        b.extend(
                            data.iter()
                                .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                        );
                    }
                },
                err_callback,
                None,
            )?
        }
        cpal::SampleFormat::U16 => {
            let buf = Arc::clone(&buffer);
            device.build_input_stream(
                &stream_config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut b) = buf.lock() {
                        b.extend(data.iter().map(|&s| (s as i32 - 32768) as i16));
                    }
                },
                err_callback,
                None,
            )?
        }
        format => anyhow::bail!("Unsupported sample format: {:?}", format),
    };

    stream.play().context("Failed to start input stream")?;

    // Fixed-cadence emission: every interval, whatever the device delivered
    // becomes one chunk. Utterances split across chunks are reassembled by
    // the recognition service's definite flags.
    let mut timestamp_ms = 0u64;
    while capturing.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(config.chunk_interval_ms));

        let raw = match buffer.lock() {
            Ok(mut b) => std::mem::take(&mut *b),
            Err(_) => break,
        };
        if raw.is_empty() {
            continue;
        }

        let samples = to_target_format(
            raw,
            device_rate,
            device_channels,
            config.sample_rate,
            config.channels,
        );

        let chunk = AudioChunk {
            samples,
            sample_rate: config.sample_rate,
            channels: config.channels,
            timestamp_ms,
        };
        timestamp_ms += config.chunk_interval_ms;

        if tx.blocking_send(chunk).is_err() {
            // Receiver gone, nothing left to capture for
            break;
        }
    }

    drop(stream);
    info!("Microphone capture stopped");
    Ok(())
}
