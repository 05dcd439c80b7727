use axum::{Json, extract::State};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct DebateRequest {
    pub topic: String,
    /// The frontend sends camelCase; snake_case is accepted too.
    #[serde(rename = "userMessage", alias = "user_message")]
    pub user_message: String,
}

#[derive(Serialize)]
pub struct DebateReply {
    pub reply: String,
}

#[derive(Serialize)]
pub struct VoiceReply {
    pub reply: String,
    /// Base64-encoded WAV, absent when synthesis is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// Text rebuttal from the AI opponent.
pub async fn reply(
    State(state): State<AppState>,
    Json(req): Json<DebateRequest>,
) -> Result<Json<DebateReply>, ApiError> {
    let reply = rebuttal(&state, &req).await?;
    Ok(Json(DebateReply { reply }))
}

/// Rebuttal with synthesized speech. TTS trouble degrades to text-only
/// rather than failing the request.
pub async fn voice_reply(
    State(state): State<AppState>,
    Json(req): Json<DebateRequest>,
) -> Result<Json<VoiceReply>, ApiError> {
    let reply = rebuttal(&state, &req).await?;

    let audio = match &state.speech {
        Some(speech) => {
            let speech = speech.clone();
            let text = reply.clone();
            let synthesized = tokio::task::spawn_blocking(move || {
                speech.blocking_lock().synthesize_wav(&text)
            })
            .await
            .map_err(|e| ApiError::Internal(format!("Synthesis task failed: {}", e)))?;

            match synthesized {
                Ok(wav) => Some(base64::engine::general_purpose::STANDARD.encode(wav)),
                Err(e) => {
                    warn!("speech synthesis failed, returning text only: {e}");
                    None
                }
            }
        }
        None => None,
    };

    Ok(Json(VoiceReply { reply, audio }))
}

async fn rebuttal(state: &AppState, req: &DebateRequest) -> Result<String, ApiError> {
    let opponent = state
        .opponent
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("No completion provider configured".to_string()))?;

    opponent
        .reply(&req.topic, &req.user_message)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))
}
