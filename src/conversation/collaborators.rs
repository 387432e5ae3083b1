//! Collaborator interfaces for the turn pipeline.
//!
//! Each stage of a conversation turn (recognize, generate, synthesize,
//! play) is an injected trait object, so every component can be swapped
//! for a test double or an alternative service binding.

use super::turn::ConversationTurn;
use crate::audio::WavAudio;
use crate::error::{BridgeError, Result};

/// Result of recognizing one audio chunk
#[derive(Debug, Clone)]
pub struct Recognition {
    pub text: String,
    pub confidence: f32,
    pub segments: Vec<RecognizedSegment>,
}

#[derive(Debug, Clone)]
pub struct RecognizedSegment {
    pub text: String,
    pub start_time: u64,
    pub end_time: u64,
    pub confidence: f32,
}

/// Response from the dialogue-generation service
#[derive(Debug, Clone)]
pub struct DialogueReply {
    pub text: String,
    pub intent: String,
    pub confidence: f32,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub value: String,
    pub confidence: f32,
}

/// Synthesized speech audio
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Encoded audio bytes (16-bit WAV)
    pub audio: Vec<u8>,
    pub duration_seconds: f64,
}

impl SynthesizedAudio {
    /// Wrap WAV bytes, measuring the duration from the decoded samples
    /// for services that do not report it
    pub fn from_wav(audio: Vec<u8>) -> Result<Self> {
        let decoded = WavAudio::from_bytes(&audio).map_err(|e| BridgeError::Synthesis {
            message: e.to_string(),
        })?;
        Ok(Self {
            audio,
            duration_seconds: decoded.duration_seconds,
        })
    }
}

/// Converts one audio chunk to text with a confidence score
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio: &[u8]) -> Result<Recognition>;
}

/// Produces an assistant response for recognized user speech
#[async_trait::async_trait]
pub trait DialogueGenerator: Send + Sync {
    async fn generate(
        &self,
        user_text: &str,
        context: &str,
        history: &[ConversationTurn],
    ) -> Result<DialogueReply>;
}

/// Converts response text to speech audio
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio>;
}

/// Plays synthesized audio to completion
#[async_trait::async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: &SynthesizedAudio) -> Result<()>;
}
