//! Debate transcript model.
//!
//! A transcript is an ordered, chronological sequence of turns. Order is
//! semantically meaningful and turns are immutable once handed to scoring.

use serde::{Deserialize, Serialize};

/// Who spoke a given turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The human debater being scored.
    User,
    /// The AI opponent.
    ///
    /// Older frontends send `ai` or `assistant`; both map here.
    #[serde(alias = "ai", alias = "assistant")]
    Opponent,
}

impl TurnRole {
    pub fn label(&self) -> &'static str {
        match self {
            TurnRole::User => "USER",
            TurnRole::Opponent => "OPPONENT",
        }
    }
}

/// One turn of the debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateTurn {
    pub role: TurnRole,
    pub content: String,
}

impl DebateTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Render the transcript as a role-labeled plain-text block, one line per
/// turn, preserving chronological order.
pub fn render_transcript(turns: &[DebateTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role.label(), t.content))
        .collect::<Vec<_>>()
        .join("\n")
}
