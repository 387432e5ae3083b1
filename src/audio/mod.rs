pub mod convert;
pub mod file;
pub mod mic;
pub mod playback;
pub mod source;

pub use file::{FileSource, WavAudio};
pub use mic::MicSource;
pub use playback::Speaker;
pub use source::{AudioChunk, AudioInput, AudioSource, AudioSourceFactory, CaptureConfig};
