//! The AI debate opponent: generates a short rebuttal to the user's
//! latest argument.

use std::sync::Arc;

use crate::error::BanterError;
use crate::judge::CompletionClient;

const OPPONENT_SYSTEM_PROMPT: &str = "You are an expert debater.";

const REBUTTAL_TEMPLATE: &str = r#"You are a skilled debate opponent.
Debate topic: {topic}

The user argues:
"{message}"

Respond with a logical rebuttal.
Keep it under 4 sentences.
Be respectful but firm."#;

/// Generates rebuttals via the completion capability.
///
/// Unlike the judge, the opponent has no meaningful degraded output, so
/// provider failure propagates to the caller.
pub struct DebateOpponent {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
}

impl DebateOpponent {
    pub fn new(client: Arc<dyn CompletionClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    /// Produce a rebuttal for the user's latest message.
    ///
    /// Empty or near-empty completions are retried a few times with a
    /// short delay; persistent emptiness is an error.
    pub async fn reply(&self, topic: &str, user_message: &str) -> Result<String, BanterError> {
        let prompt = REBUTTAL_TEMPLATE
            .replace("{topic}", topic)
            .replace("{message}", user_message);

        const MAX_ATTEMPTS: u32 = 3;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            }

            let raw = self
                .client
                .complete(OPPONENT_SYSTEM_PROMPT, &prompt, Some(self.max_tokens))
                .await?;
            let reply = sanitize_reply(&raw);

            if reply.len() > 10 {
                return Ok(reply);
            }
            tracing::warn!(
                "empty rebuttal on attempt {}/{}, retrying",
                attempt + 1,
                MAX_ATTEMPTS
            );
        }

        Err(BanterError::EmptyCompletion {
            attempts: MAX_ATTEMPTS,
        })
    }
}

/// Strip reasoning tags, leftover markup, and markdown emphasis from a
/// model completion, leaving only the spoken rebuttal.
pub fn sanitize_reply(response: &str) -> String {
    const REASONING_TAGS: &[&str] = &[
        "thinking",
        "think",
        "reasoning",
        "reflection",
        "internal",
        "analysis",
        "scratchpad",
    ];

    let mut result = response.to_string();

    for tag in REASONING_TAGS {
        let pattern = format!(r"(?is)<{tag}[^>]*>.*?</{tag}>");
        if let Ok(re) = regex::Regex::new(&pattern) {
            result = re.replace_all(&result, "").to_string();
        }
    }

    // Orphaned tags left after the paired strip.
    if let Ok(re) = regex::Regex::new(r"</?[\w]+[^>]*>") {
        result = re.replace_all(&result, "").to_string();
    }

    result = result.replace('*', "");

    if let Ok(re) = regex::Regex::new(r"\s+") {
        result = re.replace_all(&result, " ").to_string();
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_thinking_block() {
        let input = "<thinking>Weigh the claim first...</thinking>Your premise assumes too much.";
        assert_eq!(sanitize_reply(input), "Your premise assumes too much.");
    }

    #[test]
    fn test_sanitize_strips_multiline_block() {
        let input = "<think>\nseveral\nlines\n</think>Regulation lags invention.";
        assert_eq!(sanitize_reply(input), "Regulation lags invention.");
    }

    #[test]
    fn test_sanitize_strips_orphan_tags_and_emphasis() {
        let input = "That is <em>not</em> the *whole* story.";
        assert_eq!(sanitize_reply(input), "That is not the whole story.");
    }

    #[test]
    fn test_sanitize_plain_text_untouched() {
        let input = "History disagrees with you.";
        assert_eq!(sanitize_reply(input), input);
    }

    #[tokio::test]
    async fn test_reply_returns_sanitized_text() {
        use std::sync::Arc;

        struct Canned;

        #[async_trait::async_trait]
        impl CompletionClient for Canned {
            async fn complete(
                &self,
                _system: &str,
                _user: &str,
                _max_tokens: Option<u32>,
            ) -> Result<String, BanterError> {
                Ok("<thinking>hmm</thinking>Your argument ignores base rates.".to_string())
            }
        }

        let opponent = DebateOpponent::new(Arc::new(Canned), 200);
        let reply = opponent.reply("AI Safety", "AI is dangerous.").await.unwrap();
        assert_eq!(reply, "Your argument ignores base rates.");
    }
}
