//! Prosody analysis: volume, fluency, and pitch-variation sub-scores
//! derived purely from signal statistics of one recording.
//!
//! The pitch sub-score is an amplitude-variance proxy (loudness spread
//! across time windows), not true fundamental-frequency tracking. That is
//! deliberate; the heuristic is kept as shipped.

use serde::{Deserialize, Serialize};

use crate::audio::AudioClip;
use crate::error::BanterError;

/// Tuning constants for the prosody heuristics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProsodyConfig {
    /// Bottom of the ideal conversational loudness band, dBFS.
    pub loudness_floor_db: f64,
    /// Top of the ideal conversational loudness band, dBFS.
    pub loudness_ceiling_db: f64,
    /// Below this level a chunk counts as silence, dBFS.
    pub silence_threshold_db: f64,
    /// Granularity of the silence scan.
    pub silence_chunk_ms: u32,
    /// Width of the loudness windows feeding the pitch proxy.
    pub pitch_window_ms: u32,
}

impl Default for ProsodyConfig {
    fn default() -> Self {
        Self {
            loudness_floor_db: -20.0,
            loudness_ceiling_db: -10.0,
            silence_threshold_db: -50.0,
            silence_chunk_ms: 10,
            pitch_window_ms: 500,
        }
    }
}

/// Signal-derived half of the score breakdown.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct ProsodyScore {
    /// 0-15.
    pub volume: f64,
    /// 0-20: fluency (0-10) + pitch variation (0-10).
    pub pitch_fluency: f64,
}

/// Scores one recording. Stateless apart from its config; never fails,
/// undecodable audio degrades to a zero score instead.
#[derive(Debug, Clone, Default)]
pub struct ProsodyAnalyzer {
    config: ProsodyConfig,
}

impl ProsodyAnalyzer {
    pub fn new(config: ProsodyConfig) -> Self {
        Self { config }
    }

    /// Score raw WAV bytes. Decode failure is recovered locally: the
    /// result is all-zero and the cause goes to the log only.
    pub fn score(&self, audio_bytes: &[u8]) -> ProsodyScore {
        match self.try_score(audio_bytes) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("audio scoring failed, defaulting to zero: {e}");
                ProsodyScore::default()
            }
        }
    }

    fn try_score(&self, audio_bytes: &[u8]) -> Result<ProsodyScore, BanterError> {
        let clip = AudioClip::from_wav_bytes(audio_bytes)?;
        Ok(self.score_clip(&clip))
    }

    /// Score an already-decoded clip.
    pub fn score_clip(&self, clip: &AudioClip) -> ProsodyScore {
        let cfg = &self.config;

        let volume = volume_score(clip.dbfs(), cfg.loudness_floor_db, cfg.loudness_ceiling_db);

        let total = clip.duration_secs();
        let ratio = if total > 0.0 {
            clip.non_silent_secs(cfg.silence_threshold_db, cfg.silence_chunk_ms) / total
        } else {
            0.0
        };
        let fluency = fluency_score(ratio);

        let pitch = pitch_score(&clip.window_levels(cfg.pitch_window_ms));

        ProsodyScore {
            volume: round1(volume),
            pitch_fluency: round1(fluency + pitch),
        }
    }
}

/// Volume sub-score, 0-15. Full marks inside the ideal band; above it the
/// penalty slope is twice as steep as below (clipping hurts a listener
/// more than mild quietness).
pub fn volume_score(dbfs: f64, floor_db: f64, ceiling_db: f64) -> f64 {
    if dbfs >= floor_db && dbfs <= ceiling_db {
        15.0
    } else if dbfs > ceiling_db {
        (15.0 - (dbfs - ceiling_db) * 2.0).max(0.0)
    } else {
        (15.0 - (floor_db - dbfs)).max(0.0)
    }
}

/// Fluency sub-score, 0-10, from the non-silent fraction of the clip.
/// The band [0.6, 0.9] reads as fluent speech with natural pauses.
pub fn fluency_score(ratio: f64) -> f64 {
    if (0.6..=0.9).contains(&ratio) {
        10.0
    } else {
        (10.0 - (ratio - 0.75).abs() * 20.0).max(0.0)
    }
}

/// Pitch-variation sub-score, 0-10, from per-window loudness spread.
/// Fewer than two windows is insufficient data: neutral 5.
pub fn pitch_score(window_levels: &[f64]) -> f64 {
    if window_levels.len() < 2 {
        return 5.0;
    }
    let max = window_levels.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = window_levels.iter().cloned().fold(f64::INFINITY, f64::min);
    10f64.min((max - min) / 2.0)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: f64 = -20.0;
    const CEILING: f64 = -10.0;

    #[test]
    fn test_volume_ideal_band_scores_full() {
        for dbfs in [-20.0, -17.5, -15.0, -10.0] {
            assert_eq!(volume_score(dbfs, FLOOR, CEILING), 15.0);
        }
    }

    #[test]
    fn test_volume_too_loud() {
        // 15 - (-5 + 10) * 2 = 5
        assert_eq!(volume_score(-5.0, FLOOR, CEILING), 5.0);
    }

    #[test]
    fn test_volume_too_quiet() {
        // 15 - |-30 + 20| = 5
        assert_eq!(volume_score(-30.0, FLOOR, CEILING), 5.0);
    }

    #[test]
    fn test_volume_clamped_to_range() {
        for dbfs in [0.0, -2.0, -40.0, -80.0, f64::NEG_INFINITY] {
            let score = volume_score(dbfs, FLOOR, CEILING);
            assert!((0.0..=15.0).contains(&score), "dbfs {dbfs} gave {score}");
        }
    }

    #[test]
    fn test_fluency_center_scores_full() {
        assert_eq!(fluency_score(0.75), 10.0);
        assert_eq!(fluency_score(0.6), 10.0);
        assert_eq!(fluency_score(0.9), 10.0);
    }

    #[test]
    fn test_fluency_zero_ratio() {
        // max(0, 10 - 0.75 * 20) = 0
        assert_eq!(fluency_score(0.0), 0.0);
    }

    #[test]
    fn test_fluency_no_pauses_penalized() {
        // 10 - |1.0 - 0.75| * 20 = 5
        assert_eq!(fluency_score(1.0), 5.0);
    }

    #[test]
    fn test_pitch_insufficient_windows() {
        assert_eq!(pitch_score(&[]), 5.0);
        assert_eq!(pitch_score(&[-15.0]), 5.0);
    }

    #[test]
    fn test_pitch_variance_twenty_caps_at_ten() {
        assert_eq!(pitch_score(&[-10.0, -30.0]), 10.0);
    }

    #[test]
    fn test_pitch_variance_scaled() {
        assert_eq!(pitch_score(&[-12.0, -20.0]), 4.0);
    }

    #[test]
    fn test_pitch_huge_variance_clamped() {
        assert_eq!(pitch_score(&[-5.0, f64::NEG_INFINITY]), 10.0);
    }

    #[test]
    fn test_score_garbage_bytes_is_zero() {
        let analyzer = ProsodyAnalyzer::default();
        let score = analyzer.score(b"definitely not audio");
        assert_eq!(score, ProsodyScore::default());
    }

    #[test]
    fn test_score_clip_zero_duration() {
        let analyzer = ProsodyAnalyzer::default();
        let clip = AudioClip::from_samples(vec![], 8000);
        let score = analyzer.score_clip(&clip);
        // Silence: volume 0, fluency 0, single-window fallback pitch 5.
        assert_eq!(score.volume, 0.0);
        assert_eq!(score.pitch_fluency, 5.0);
    }

    #[test]
    fn test_score_clip_ideal_speech() {
        // 400ms at 8kHz: 30 audible 10ms chunks then 10 silent ones.
        // Overall RMS is tuned so the whole clip sits at -15 dBFS.
        let amp = 10f32.powf(-15.0 / 20.0) / 0.75f32.sqrt();
        let mut samples: Vec<f32> = (0..2400)
            .map(|i| if i % 2 == 0 { amp } else { -amp })
            .collect();
        samples.extend(vec![0.0; 800]);
        let clip = AudioClip::from_samples(samples, 8000);

        let analyzer = ProsodyAnalyzer::default();
        let score = analyzer.score_clip(&clip);
        // Volume in band => 15; ratio 0.75 => fluency 10; one 500ms
        // window => pitch 5.
        assert_eq!(score.volume, 15.0);
        assert_eq!(score.pitch_fluency, 15.0);
    }
}
