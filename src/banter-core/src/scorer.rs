//! Score aggregation: runs the prosody analyzer and the content judge
//! for one request and composes their results into a full breakdown.
//!
//! Both subsystems fail-safe to zeros, so composition is total: the
//! breakdown always carries every field and the request always succeeds.

use serde::Serialize;

use crate::judge::ContentJudge;
use crate::prosody::{ProsodyAnalyzer, ProsodyScore};
use crate::transcript::DebateTurn;

/// Per-dimension decomposition of the total score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub volume: f64,
    pub pitch_fluency: f64,
    pub novelty: f64,
    pub engagement: f64,
    pub efficiency: f64,
}

/// Final scoring response: bounded total (0-100), full breakdown, and
/// the judge's natural-language feedback.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub feedback: String,
}

/// Orchestrates both scoring subsystems for one request.
pub struct DebateScorer {
    prosody: ProsodyAnalyzer,
    judge: ContentJudge,
}

impl DebateScorer {
    pub fn new(prosody: ProsodyAnalyzer, judge: ContentJudge) -> Self {
        Self { prosody, judge }
    }

    /// Score one debate. Audio is optional; without it the prosody half
    /// of the breakdown is zero and the analyzer is never invoked.
    ///
    /// The analyzer (CPU-bound) and the judge (network-bound) run
    /// concurrently and are joined before composing the breakdown.
    pub async fn score(
        &self,
        topic: &str,
        turns: &[DebateTurn],
        audio: Option<Vec<u8>>,
    ) -> ScoreReport {
        let prosody_task = async {
            match audio {
                Some(bytes) => {
                    let analyzer = self.prosody.clone();
                    tokio::task::spawn_blocking(move || analyzer.score(&bytes))
                        .await
                        .unwrap_or_else(|e| {
                            tracing::warn!("prosody task failed: {e}");
                            ProsodyScore::default()
                        })
                }
                None => ProsodyScore::default(),
            }
        };

        let (prosody, content) = tokio::join!(prosody_task, self.judge.score(topic, turns));

        let total = prosody.volume
            + prosody.pitch_fluency
            + content.novelty
            + content.engagement
            + content.efficiency;

        ScoreReport {
            total_score: (total * 10.0).round() / 10.0,
            breakdown: ScoreBreakdown {
                volume: prosody.volume,
                pitch_fluency: prosody.pitch_fluency,
                novelty: content.novelty,
                engagement: content.engagement,
                efficiency: content.efficiency,
            },
            feedback: content.feedback,
        }
    }
}
