//! Sample format conversion helpers shared by the capture sources.

/// Resample by nearest-sample selection.
///
/// Good enough for speech at the rates involved here (typically 48kHz or
/// 44.1kHz device input down to 16kHz mono).
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let out_len = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src = (i as u64 * from_rate as u64 / to_rate as u64) as usize;
        out.push(samples[src.min(samples.len() - 1)]);
    }
    out
}

/// Convert interleaved stereo to mono by summing channels
/// (no division, to preserve volume)
pub fn stereo_to_mono(samples: &[i16]) -> Vec<i16> {
    let mut mono = Vec::with_capacity(samples.len() / 2);
    for pair in samples.chunks_exact(2) {
        let sum = pair[0] as i32 + pair[1] as i32;
        mono.push(sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
    }
    mono
}

/// Normalize a captured buffer to the target rate and channel count
pub fn to_target_format(
    samples: Vec<i16>,
    from_rate: u32,
    from_channels: u16,
    to_rate: u32,
    to_channels: u16,
) -> Vec<i16> {
    let samples = if from_channels == 2 && to_channels == 1 {
        stereo_to_mono(&samples)
    } else {
        samples
    };
    resample(&samples, from_rate, to_rate)
}
