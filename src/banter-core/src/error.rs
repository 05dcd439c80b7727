//! Error types for the scoring engine and its collaborators.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BanterError {
    #[error("OpenAI API error: {0}")]
    OpenAIError(#[from] async_openai::error::OpenAIError),

    #[error("Audio decode error: {0}")]
    AudioDecode(#[from] hound::Error),

    #[error("Malformed judge verdict: {0}")]
    MalformedVerdict(String),

    #[error("Completion provider is not configured")]
    ProviderUnavailable,

    #[error("Empty completion after {attempts} attempts")]
    EmptyCompletion { attempts: u32 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TTS error: {0}")]
    TtsError(String),
}
