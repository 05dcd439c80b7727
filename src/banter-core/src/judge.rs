//! Content judging: rubric-based evaluation of the debate transcript by a
//! language-model completion, with defensive extraction of the verdict.
//!
//! The judge makes exactly one completion call per request and never
//! raises past its boundary: transport errors, an unconfigured provider,
//! or an unparsable response all degrade to a zero verdict with a
//! diagnostic feedback string.

use std::sync::Arc;
use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
};
use serde::{Deserialize, Serialize};

use crate::error::BanterError;
use crate::transcript::{DebateTurn, render_transcript};

/// A single system+user completion round trip.
///
/// This is the seam between the scoring engine and the hosted model;
/// tests substitute a canned implementation.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: Option<u32>,
    ) -> Result<String, BanterError>;
}

/// Production [`CompletionClient`] backed by an OpenAI-compatible API.
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionClient {
    /// Build a client with a bounded request timeout so a hung provider
    /// cannot stall scoring indefinitely.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BanterError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BanterError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let config = OpenAIConfig::new()
            .with_api_key(api_key.into())
            .with_api_base(api_base.into());

        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client),
            model: model.into(),
        })
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: Option<u32>,
    ) -> Result<String, BanterError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: system_prompt.to_string().into(),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: user_prompt.to_string().into(),
                name: None,
            }),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        if let Some(limit) = max_tokens {
            builder.max_completion_tokens(limit);
        }
        let request = builder.build()?;

        let response = self.client.chat().create(request).await?;
        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}

/// Content half of the score breakdown.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ContentScore {
    /// 0-35.
    pub novelty: f64,
    /// 0-20.
    pub engagement: f64,
    /// 0-10.
    pub efficiency: f64,
    pub feedback: String,
}

/// Wire shape of the verdict the model is asked to return. Any missing
/// field falls back rather than failing the decode.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    novelty_score: f64,
    #[serde(default)]
    engagement_score: f64,
    #[serde(default)]
    efficiency_score: f64,
    #[serde(default)]
    feedback: String,
}

const JUDGE_SYSTEM_PROMPT: &str = "You are a professional debate judge.";

const RUBRIC_TEMPLATE: &str = r#"Evaluate the USER's performance in this debate on the topic: "{topic}".
Rubric (Total 65 points for content):
1. Novel Contributions (35p): Did they bring new evidence, analogies, or perspectives to shift the topic?
2. Engagement (20p): Did they respond to the opponent's questions, recognize valid claims, and expand on them?
3. Efficiency (10p): Were they concise and clear?

Debate History:
{transcript}

Return a JSON object with:
- novelty_score (0-35)
- engagement_score (0-20)
- efficiency_score (0-10)
- feedback (String, 2-3 sentences max summarizing pros/cons)

ONLY RETURN THE JSON."#;

/// Build the judge's user prompt for one scoring request.
pub fn build_rubric_prompt(topic: &str, turns: &[DebateTurn]) -> String {
    RUBRIC_TEMPLATE
        .replace("{topic}", topic)
        .replace("{transcript}", &render_transcript(turns))
}

/// Extract a [`ContentScore`] from the model's free-text response.
///
/// If the response contains a fenced code block (with or without a
/// language tag, possibly surrounded by prose), the block's content is
/// parsed; each numeric field is clamped into its declared range.
pub fn parse_verdict(response: &str) -> Result<ContentScore, BanterError> {
    let payload = strip_code_fence(response);
    let raw: RawVerdict = serde_json::from_str(payload)
        .map_err(|e| BanterError::MalformedVerdict(e.to_string()))?;

    Ok(ContentScore {
        novelty: raw.novelty_score.clamp(0.0, 35.0),
        engagement: raw.engagement_score.clamp(0.0, 20.0),
        efficiency: raw.efficiency_score.clamp(0.0, 10.0),
        feedback: raw.feedback,
    })
}

/// Take the content of the first fenced block anywhere in the text, or
/// the whole text when no fence is present. Models routinely wrap the
/// verdict in prose before and after the fence.
fn strip_code_fence(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text.trim();
    };
    let after = &text[start + 3..];
    // Drop an optional language tag on the fence line.
    let body = match after.split_once('\n') {
        Some((tag, rest))
            if !tag.trim().is_empty() && tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            rest
        }
        _ => after,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Judges one debate via the completion capability.
pub struct ContentJudge {
    client: Option<Arc<dyn CompletionClient>>,
}

impl ContentJudge {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A judge with no provider: every request gets the diagnostic
    /// zero verdict without a network attempt.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Score the transcript. Never raises: provider failure and
    /// malformed responses both degrade to a zero verdict.
    pub async fn score(&self, topic: &str, turns: &[DebateTurn]) -> ContentScore {
        let Some(client) = &self.client else {
            return diagnostic_verdict("Scoring unavailable (no completion provider configured).");
        };

        let prompt = build_rubric_prompt(topic, turns);
        let response = match client.complete(JUDGE_SYSTEM_PROMPT, &prompt, None).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("judge completion failed: {e}");
                return diagnostic_verdict("Error analyzing debate content.");
            }
        };

        match parse_verdict(&response) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("judge verdict unparsable: {e}");
                diagnostic_verdict("Error analyzing debate content.")
            }
        }
    }
}

fn diagnostic_verdict(reason: &str) -> ContentScore {
    ContentScore {
        feedback: reason.to_string(),
        ..ContentScore::default()
    }
}
