use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::state::AppState;

use super::{CompletionError, CHAT_FALLBACK, DEFAULT_VISION_PROMPT, VISION_FALLBACK};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    /// True when the provider was unreachable and `text` is the
    /// placeholder, so clients can offer a retry.
    pub degraded: bool,
}

/// Degrades a provider failure into an in-band placeholder reply. A
/// broken AI never turns into a 5xx for the student.
fn degrade(result: Result<String, CompletionError>, fallback: &str) -> AssistantReply {
    match result {
        Ok(text) => AssistantReply {
            text,
            degraded: false,
        },
        Err(err) => {
            warn!("assistant call degraded: {err}");
            AssistantReply {
                text: fallback.to_string(),
                degraded: true,
            }
        }
    }
}

/// POST /api/v1/assistant/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    let result = state.assistant.complete(&req.history, &req.message).await;
    Ok(Json(degrade(result, CHAT_FALLBACK)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionRequest {
    /// Base64-encoded image bytes, without a data-URL prefix.
    pub data: String,
    pub mime_type: String,
    #[serde(default)]
    pub prompt: String,
}

/// POST /api/v1/assistant/vision
pub async fn handle_vision(
    State(state): State<AppState>,
    Json(req): Json<VisionRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    // Reject payloads that are not actually base64 before shipping them
    // to the provider.
    if req.data.is_empty() || BASE64.decode(req.data.as_bytes()).is_err() {
        return Err(AppError::Validation(
            "data must be base64-encoded image bytes".to_string(),
        ));
    }

    let prompt = match req.prompt.trim() {
        "" => DEFAULT_VISION_PROMPT,
        trimmed => trimmed,
    };
    let result = state
        .assistant
        .analyze_image(&req.data, &req.mime_type, prompt)
        .await;
    Ok(Json(degrade(result, VISION_FALLBACK)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_text_through() {
        let reply = degrade(Ok("All about limits".to_string()), CHAT_FALLBACK);
        assert_eq!(reply.text, "All about limits");
        assert!(!reply.degraded);
    }

    #[test]
    fn test_failure_degrades_to_placeholder() {
        let reply = degrade(Err(CompletionError::Empty), CHAT_FALLBACK);
        assert_eq!(reply.text, CHAT_FALLBACK);
        assert!(reply.degraded);

        let reply = degrade(
            Err(CompletionError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
            VISION_FALLBACK,
        );
        assert_eq!(reply.text, VISION_FALLBACK);
        assert!(reply.degraded);
    }
}
