//! Gemini backend for the assistant.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::chat::{ChatMessage, ChatRole};

use super::{CompletionError, CompletionService, SYSTEM_INSTRUCTION};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all assistant calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-3-pro-preview";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn text_content(role: ChatRole, text: &str) -> Content {
    Content {
        role: Some(match role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }),
        parts: vec![Part::Text {
            text: text.to_string(),
        }],
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        GeminiClient {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, CompletionError> {
        let url = format!("{GEMINI_API_URL}/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        debug!("assistant call returned {} candidate(s)", body.candidates.len());

        body.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(CompletionError::Empty)
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, CompletionError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| text_content(m.role, &m.text))
            .collect();
        contents.push(text_content(ChatRole::User, message));

        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            }),
            contents,
        };
        self.generate(&request).await
    }

    async fn analyze_image(
        &self,
        base64_data: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64_data.to_string(),
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        };
        self.generate(&request).await
    }
}
