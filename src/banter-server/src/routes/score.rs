use axum::{Json, extract::Multipart, extract::State};
use banter_core::{DebateTurn, ScoreReport};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Score a finished debate.
///
/// Multipart fields: `topic` (text), `history` (JSON array of
/// `{role, content}` in chronological order), optional `file` (WAV audio
/// of the final user turn). Subsystem degradation never fails the
/// request; only a malformed payload does.
pub async fn score(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScoreReport>, ApiError> {
    let mut topic: Option<String> = None;
    let mut history: Option<Vec<DebateTurn>> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "topic" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read topic: {}", e)))?;
                topic = Some(text);
            }
            "history" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read history: {}", e)))?;
                let turns = serde_json::from_str(&text)
                    .map_err(|e| ApiError::BadRequest(format!("Invalid history JSON: {}", e)))?;
                history = Some(turns);
            }
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read audio: {}", e)))?;
                audio = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let topic = topic.ok_or_else(|| ApiError::BadRequest("Missing 'topic' field".to_string()))?;
    let history =
        history.ok_or_else(|| ApiError::BadRequest("Missing 'history' field".to_string()))?;

    debug!(
        turns = history.len(),
        has_audio = audio.is_some(),
        "scoring request"
    );

    let report = state.scorer.score(&topic, &history, audio).await;
    Ok(Json(report))
}
