use serde::{Deserialize, Serialize};

use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
        }
    }
}

/// A student-submitted ask for missing content. No requester identity is
/// tracked; curation happens entirely on the admin side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub details: String,
    pub status: RequestStatus,
    pub created_at: i64,
}

impl ResourceRequest {
    pub fn from_document(doc: &Document) -> Option<Self> {
        let mut request: ResourceRequest = serde_json::from_value(doc.data.clone()).ok()?;
        request.id = doc.id.clone();
        Some(request)
    }
}
