use serde::{Deserialize, Serialize};

use crate::store::Document;

/// One record per distinct anonymous client. The id is the client's own
/// persistent token; `lastSeen` is absent until the server-assigned
/// timestamp of the first heartbeat resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub last_seen: Option<i64>,
}

impl PresenceRecord {
    pub fn from_document(doc: &Document) -> Option<Self> {
        let mut record: PresenceRecord = serde_json::from_value(doc.data.clone()).ok()?;
        record.id = doc.id.clone();
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_without_last_seen_decodes_as_none() {
        let doc = Document {
            id: "client-1".to_string(),
            data: json!({}),
        };
        let record = PresenceRecord::from_document(&doc).expect("should decode");
        assert_eq!(record.last_seen, None);
    }
}
