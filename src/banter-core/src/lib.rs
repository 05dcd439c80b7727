//! Banter Core Library
//!
//! Provides the debate performance scoring engine (prosody analysis,
//! content judging, score aggregation), the AI debate opponent, and
//! speech synthesis for voice rebuttals.

pub mod audio;
pub mod config;
pub mod error;
pub mod judge;
pub mod opponent;
pub mod prosody;
pub mod scorer;
pub mod speech;
pub mod transcript;

pub use audio::AudioClip;
pub use config::EngineConfig;
pub use error::BanterError;
pub use judge::{CompletionClient, ContentJudge, ContentScore, OpenAiCompletionClient};
pub use opponent::DebateOpponent;
pub use prosody::{ProsodyAnalyzer, ProsodyConfig, ProsodyScore};
pub use scorer::{DebateScorer, ScoreBreakdown, ScoreReport};
pub use speech::SpeechSynthesizer;
pub use transcript::{DebateTurn, TurnRole, render_transcript};
