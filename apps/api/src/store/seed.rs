//! Fallback dataset served when the resource subscription fails or the
//! collection is empty, so a fresh deployment never renders an empty,
//! broken-looking feed.

use chrono::Utc;

use crate::models::resource::{Resource, ResourceType};

/// Ids of the demo records. These are exempt from deletion and from
/// counter/pin mutation so a curation mistake can't wipe the demo data.
pub const PROTECTED_IDS: [&str; 2] = ["1", "2"];

pub fn resources() -> Vec<Resource> {
    let now = Utc::now().timestamp_millis();
    vec![
        Resource {
            id: "1".to_string(),
            title: "Calculus Cheat Sheet".to_string(),
            description:
                "A comprehensive quick reference guide for limits, derivatives, and integrals."
                    .to_string(),
            kind: ResourceType::Pdf,
            url: "https://pdfobject.com/pdf/sample.pdf".to_string(),
            thumbnail_url: Some(
                "https://upload.wikimedia.org/wikipedia/commons/thumb/c/c3/De_Agnesi_-_Instituzioni_analitiche_ad_uso_della_giovent%C3%B9_italiana%2C_1748_-_3983685.tif/lossy-page1-1200px-De_Agnesi_-_Instituzioni_analitiche_ad_uso_della_giovent%C3%B9_italiana%2C_1748_-_3983685.tif.jpg"
                    .to_string(),
            ),
            category: "Mathematics".to_string(),
            added_at: now,
            likes: 12,
            dislikes: 1,
            views: 120,
            is_pinned: true,
        },
        Resource {
            id: "2".to_string(),
            title: "The French Revolution Explained".to_string(),
            description: "Deep dive into the causes and effects of the revolution.".to_string(),
            kind: ResourceType::Video,
            url: "https://www.youtube.com/watch?v=VEZqarUnVpo".to_string(),
            thumbnail_url: None,
            category: "History".to_string(),
            added_at: now - 100_000,
            likes: 45,
            dislikes: 2,
            views: 340,
            is_pinned: false,
        },
    ]
}
