use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub speech: SpeechConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Credentials and endpoint for the remote speech-recognition service
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// WebSocket endpoint of the streaming recognition service
    pub endpoint: String,
    pub app_id: String,
    pub access_token: String,
    /// Fixed resource identifier expected by the service
    pub resource_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Chunk emission cadence in milliseconds
    pub chunk_interval_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
