//! Speech playback via the default cpal output device.

use super::convert::{resample, stereo_to_mono};
use super::file::WavAudio;
use crate::conversation::{AudioSink, SynthesizedAudio};
use crate::error::{BridgeError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Plays synthesized WAV audio on the default output device and returns
/// once playback completes. One instance is owned by each conversation
/// engine; nothing else touches the output device.
pub struct Speaker;

impl Speaker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioSink for Speaker {
    async fn play(&self, audio: &SynthesizedAudio) -> Result<()> {
        let wav = WavAudio::from_bytes(&audio.audio).map_err(|e| BridgeError::Playback {
            message: e.to_string(),
        })?;

        // cpal streams are not Send; playback blocks a dedicated thread
        tokio::task::spawn_blocking(move || play_to_device(wav))
            .await
            .map_err(|e| BridgeError::Playback {
                message: e.to_string(),
            })?
    }
}

fn play_to_device(wav: WavAudio) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| BridgeError::Playback {
            message: "No output device available".to_string(),
        })?;

    let device_config = device
        .default_output_config()
        .map_err(|e| BridgeError::Playback {
            message: format!("Failed to query output config: {}", e),
        })?;
    let out_rate = device_config.sample_rate();
    let out_channels = device_config.channels() as usize;
    let stream_config: cpal::StreamConfig = device_config.config();

    let mono = if wav.channels == 2 {
        stereo_to_mono(&wav.samples)
    } else {
        wav.samples
    };
    let samples = Arc::new(resample(&mono, wav.sample_rate, out_rate));
    let total = samples.len();

    debug!(
        "Playing {} samples at {}Hz on {} channels",
        total, out_rate, out_channels
    );

    let position = Arc::new(AtomicUsize::new(0));
    let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
    let err_callback = |err| {
        debug!("Output stream error: {}", err);
    };

    let stream = match device_config.sample_format() {
        cpal::SampleFormat::F32 => {
            let samples = Arc::clone(&samples);
            let position = Arc::clone(&position);
            device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(out_channels) {
                        let i = position.fetch_add(1, Ordering::SeqCst);
                        let value = if i < total {
                            samples[i] as f32 / 32768.0
                        } else {
                            if i == total {
                                let _ = done_tx.send(());
                            }
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = value;
                        }
                    }
                },
                err_callback,
                None,
            )
        }
        cpal::SampleFormat::I16 => {
            let samples = Arc::clone(&samples);
            let position = Arc::clone(&position);
            device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(out_channels) {
                        let i = position.fetch_add(1, Ordering::SeqCst);
                        let value = if i < total {
                            samples[i]
                        } else {
                            if i == total {
                                let _ = done_tx.send(());
                            }
                            0
                        };
                        for out in frame.iter_mut() {
                            *out = value;
                        }
                    }
                },
                err_callback,
                None,
            )
        }
        format => {
            return Err(BridgeError::Playback {
                message: format!("Unsupported output format: {:?}", format),
            })
        }
    }
    .map_err(|e| BridgeError::Playback {
        message: format!("Failed to build output stream: {}", e),
    })?;

    stream.play().map_err(|e| BridgeError::Playback {
        message: format!("Failed to start output stream: {}", e),
    })?;

    // Wait for the callback to run past the last sample, bounded by the
    // audio duration plus a margin in case the device stalls
    let timeout = Duration::from_secs_f64(total as f64 / out_rate as f64 + 1.0);
    let _ = done_rx.recv_timeout(timeout);

    Ok(())
}
