//! Conversation turn-taking
//!
//! This module provides the `ConversationEngine` that manages:
//! - The serializing FIFO chunk queue (one turn in flight at a time)
//! - The turn pipeline: recognize -> dialogue -> synthesize -> play back
//! - The confidence gate in front of dialogue generation
//! - Append-only conversation history and per-instance statistics

mod collaborators;
mod engine;
mod turn;

pub use collaborators::{
    AudioSink, DialogueGenerator, DialogueReply, Entity, Recognition, RecognizedSegment,
    SpeechRecognizer, SpeechSynthesizer, SynthesizedAudio,
};
pub use engine::{
    Collaborators, ConversationEngine, ConversationState, ConversationStats, CONFIDENCE_THRESHOLD,
};
pub use turn::{ConversationTurn, Role};
