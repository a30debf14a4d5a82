//! AI study assistant — the single point of entry for generative-AI
//! calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the AI provider
//! directly. Everything goes through `CompletionService`, so handlers
//! (and tests) never know which provider sits behind it.

pub mod gemini;
pub mod handlers;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::chat::ChatMessage;

/// System prompt for every chat turn.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful, encouraging, and academic study \
     assistant for college students. Keep answers concise but thorough.";

/// Prompt used when a vision caller supplies none.
pub const DEFAULT_VISION_PROMPT: &str =
    "Analyze this image and explain its educational content.";

/// Shown in place of a chat reply when the provider is unreachable.
pub const CHAT_FALLBACK: &str =
    "I'm having trouble connecting to the study network. Please try again later.";

/// Shown in place of an image analysis when the provider is unreachable.
pub const VISION_FALLBACK: &str = "Failed to analyze image. Please try again.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    Empty,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// One chat turn: transcript so far plus the new user message.
    async fn complete(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, CompletionError>;

    /// Describes an image (base64 bytes + mime type) under a prompt.
    async fn analyze_image(
        &self,
        base64_data: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, CompletionError>;
}
