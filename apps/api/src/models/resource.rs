use serde::{Deserialize, Serialize};

use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceType {
    Pdf,
    Video,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Pdf => "PDF",
            ResourceType::Video => "VIDEO",
        }
    }
}

/// A catalog entry: a link to a PDF or video plus its engagement counters.
/// Field names follow the stored document schema (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Store-assigned id; injected from the document key, not the body.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub category: String,
    /// Creation time in epoch millis.
    pub added_at: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Resource {
    /// Decodes a store document into a `Resource`. Counter fields missing
    /// from older documents default to zero, `isPinned` to false.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let mut resource: Resource = serde_json::from_value(doc.data.clone()).ok()?;
        resource.id = doc.id.clone();
        Some(resource)
    }
}

/// Admin-supplied payload for creating a resource. Counters and pin state
/// are always server-initialized, never client-supplied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub category: String,
}
