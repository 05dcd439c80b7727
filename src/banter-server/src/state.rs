use std::sync::Arc;

use banter_core::{DebateOpponent, DebateScorer, SpeechSynthesizer};
use tokio::sync::Mutex;

/// Shared application state. Everything is request-independent; the
/// scorer itself holds no mutable state across requests.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<DebateScorer>,
    /// Absent when no completion provider is configured; `/debate`
    /// then answers 502.
    pub opponent: Option<Arc<DebateOpponent>>,
    /// The kokoro engine mutates during synthesis, hence the mutex.
    pub speech: Option<Arc<Mutex<SpeechSynthesizer>>>,
}

impl AppState {
    pub fn new(
        scorer: DebateScorer,
        opponent: Option<DebateOpponent>,
        speech: Option<SpeechSynthesizer>,
    ) -> Self {
        Self {
            scorer: Arc::new(scorer),
            opponent: opponent.map(Arc::new),
            speech: speech.map(|s| Arc::new(Mutex::new(s))),
        }
    }
}
