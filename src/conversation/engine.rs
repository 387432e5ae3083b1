use super::collaborators::{AudioSink, DialogueGenerator, SpeechRecognizer, SpeechSynthesizer};
use super::turn::{ConversationTurn, Role};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Recognition results at or below this confidence are discarded without
/// reaching dialogue generation (strictly-greater-than comparison)
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Turn-taking cycle of the conversation. Listening is implicit: a chunk
/// arriving while idle starts a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationState {
    Idle,
    Processing,
    Speaking,
}

/// Statistics about a conversation instance
#[derive(Debug, Clone, Serialize)]
pub struct ConversationStats {
    pub state: ConversationState,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub chunks_processed: usize,
    pub turns_completed: usize,
}

/// The injected collaborator set for one conversation instance
#[derive(Clone)]
pub struct Collaborators {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub dialogue: Arc<dyn DialogueGenerator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub playback: Arc<dyn AudioSink>,
}

/// Drives the turn-taking cycle over a serializing chunk queue.
///
/// Chunks are queued FIFO and drained by a single worker task, so at most
/// one turn (recognize -> dialogue -> synthesize -> play) is in flight at
/// any time; chunks arriving mid-turn buffer in arrival order and are
/// never dropped or reordered. A failed turn is logged, leaves the
/// history untouched, and the worker moves on to the next chunk.
pub struct ConversationEngine {
    chunk_tx: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
    state: Arc<StdMutex<ConversationState>>,
    history: Arc<Mutex<Vec<ConversationTurn>>>,
    chunks_processed: Arc<AtomicUsize>,
    turns_completed: Arc<AtomicUsize>,
    started_at: DateTime<Utc>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ConversationEngine {
    pub fn new(collaborators: Collaborators, context: impl Into<String>) -> Self {
        let (chunk_tx, chunk_rx) = mpsc::channel(64);

        let state = Arc::new(StdMutex::new(ConversationState::Idle));
        let history = Arc::new(Mutex::new(Vec::new()));
        let chunks_processed = Arc::new(AtomicUsize::new(0));
        let turns_completed = Arc::new(AtomicUsize::new(0));

        let worker = tokio::spawn(run_worker(
            chunk_rx,
            collaborators,
            context.into(),
            Arc::clone(&state),
            Arc::clone(&history),
            Arc::clone(&chunks_processed),
            Arc::clone(&turns_completed),
        ));

        Self {
            chunk_tx: Mutex::new(Some(chunk_tx)),
            state,
            history,
            chunks_processed,
            turns_completed,
            started_at: Utc::now(),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue one audio chunk for processing. Ownership of the buffer
    /// transfers to the in-flight turn when it is dequeued.
    pub async fn submit_chunk(&self, chunk: Vec<u8>) -> Result<()> {
        let guard = self.chunk_tx.lock().await;
        let tx = guard
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Conversation engine is stopped"))?;
        tx.send(chunk)
            .await
            .map_err(|_| anyhow::anyhow!("Conversation engine is stopped"))?;
        Ok(())
    }

    /// Stop accepting chunks and wait for the worker to drain.
    ///
    /// An in-flight turn runs to completion or failure; it is not
    /// cancelled.
    pub async fn stop(&self) {
        self.chunk_tx.lock().await.take();
        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                error!("Conversation worker panicked: {}", e);
            }
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(ConversationState::Idle)
    }

    /// Snapshot of the accumulated turn history
    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.history.lock().await.clone()
    }

    pub fn stats(&self) -> ConversationStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        ConversationStats {
            state: self.state(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            chunks_processed: self.chunks_processed.load(Ordering::SeqCst),
            turns_completed: self.turns_completed.load(Ordering::SeqCst),
        }
    }
}

async fn run_worker(
    mut chunk_rx: mpsc::Receiver<Vec<u8>>,
    collaborators: Collaborators,
    context: String,
    state: Arc<StdMutex<ConversationState>>,
    history: Arc<Mutex<Vec<ConversationTurn>>>,
    chunks_processed: Arc<AtomicUsize>,
    turns_completed: Arc<AtomicUsize>,
) {
    info!("Conversation worker started");

    while let Some(chunk) = chunk_rx.recv().await {
        chunks_processed.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = run_turn(
            &collaborators,
            &context,
            chunk,
            &state,
            &history,
            &turns_completed,
        )
        .await
        {
            // Failures are contained at the turn boundary: the chunk is
            // discarded and the next chunk is an independent attempt
            error!("Turn failed: {}", e);
        }

        set_state(&state, ConversationState::Idle);
    }

    info!("Conversation worker stopped");
}

async fn run_turn(
    collaborators: &Collaborators,
    context: &str,
    chunk: Vec<u8>,
    state: &Arc<StdMutex<ConversationState>>,
    history: &Arc<Mutex<Vec<ConversationTurn>>>,
    turns_completed: &Arc<AtomicUsize>,
) -> crate::error::Result<()> {
    let recognition = collaborators.recognizer.recognize(&chunk).await?;

    if recognition.confidence <= CONFIDENCE_THRESHOLD {
        debug!(
            "Discarding low-confidence recognition ({:.2}): {}",
            recognition.confidence, recognition.text
        );
        return Ok(());
    }

    set_state(state, ConversationState::Processing);

    let snapshot = history.lock().await.clone();
    let reply = collaborators
        .dialogue
        .generate(&recognition.text, context, &snapshot)
        .await?;

    let audio = collaborators.synthesizer.synthesize(&reply.text).await?;

    set_state(state, ConversationState::Speaking);
    let stamped_at = Utc::now();

    collaborators.playback.play(&audio).await?;

    // Both turns carry the speaking-transition timestamp; the user entry
    // is appended first and both land under one lock acquisition
    {
        let mut history = history.lock().await;
        history.push(ConversationTurn {
            role: Role::User,
            content: recognition.text,
            timestamp: stamped_at,
        });
        history.push(ConversationTurn {
            role: Role::Assistant,
            content: reply.text,
            timestamp: stamped_at,
        });
    }
    turns_completed.fetch_add(1, Ordering::SeqCst);

    Ok(())
}

fn set_state(state: &Arc<StdMutex<ConversationState>>, next: ConversationState) {
    if let Ok(mut s) = state.lock() {
        *s = next;
    }
}
