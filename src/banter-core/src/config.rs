//! Engine configuration loaded from a TOML file, with embedded defaults
//! so the server runs without one.
//!
//! API credentials are not configured here; they come from the
//! environment (`OPENAI_API_KEY`, `OPENAI_API_BASE`).

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::BanterError;
use crate::prosody::ProsodyConfig;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub judge: JudgeConfig,
    pub opponent: OpponentConfig,
    pub prosody: ProsodyConfig,
    pub voice: VoiceConfig,
}

/// Content judge settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Model used for rubric evaluation.
    pub model: String,
    /// Upper bound on the judged-evaluation round trip.
    pub timeout_secs: u64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

impl JudgeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Debate opponent settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 200,
            timeout_secs: 60,
        }
    }
}

impl OpponentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Voice rebuttal settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether to initialize the TTS engine at startup.
    pub enabled: bool,
    /// Kokoro voice ID for the opponent.
    pub voice: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            voice: "am_adam".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BanterError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| BanterError::ConfigError(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, BanterError> {
        toml::from_str(content)
            .map_err(|e| BanterError::ConfigError(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.judge.model, "gpt-4o-mini");
        assert_eq!(config.judge.timeout(), Duration::from_secs(60));
        assert_eq!(config.opponent.max_tokens, 200);
        assert!(!config.voice.enabled);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config.judge.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = EngineConfig::from_toml(
            r#"
[judge]
model = "llama3.1-8b"
timeout_secs = 20

[prosody]
silence_threshold_db = -45.0
"#,
        )
        .unwrap();
        assert_eq!(config.judge.model, "llama3.1-8b");
        assert_eq!(config.judge.timeout_secs, 20);
        assert_eq!(config.prosody.silence_threshold_db, -45.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.prosody.loudness_floor_db, -20.0);
        assert_eq!(config.opponent.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(EngineConfig::from_toml("judge = 3").is_err());
    }
}
