use crate::config::{AudioConfig, SpeechConfig};
use crate::conversation::Collaborators;
use crate::session::VoiceSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active streaming sessions (session_id -> session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<VoiceSession>>>>,

    /// Credentials and endpoint for the recognition service
    pub speech: SpeechConfig,

    /// Capture settings applied to new sessions
    pub audio: AudioConfig,

    /// Conversation collaborators, when the deployment provides them;
    /// sessions started without them only stream and monitor
    pub collaborators: Option<Arc<Collaborators>>,
}

impl AppState {
    pub fn new(speech: SpeechConfig, audio: AudioConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            speech,
            audio,
            collaborators: None,
        }
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = Some(Arc::new(collaborators));
        self
    }
}
