use axum::{extract::Query, extract::State, Json};
use serde::Serialize;

use crate::models::resource::Resource;
use crate::state::AppState;

use super::{engine, links, FeedQuery};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// True until the subscription has delivered its first snapshot —
    /// lets the caller tell "still loading" from "no matches".
    pub loading: bool,
    pub categories: Vec<String>,
    pub resources: Vec<FeedItem>,
}

/// GET /api/v1/resources
pub async fn handle_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let feed = state.feed.borrow().clone();
    let categories = engine::categories(&feed.resources);
    let resources = engine::render(&feed.resources, &query)
        .into_iter()
        .map(|resource| {
            let cover_url = links::thumbnail_url(&resource);
            let embed_url = links::embed_url(&resource.url, resource.kind);
            FeedItem {
                resource,
                cover_url,
                embed_url,
            }
        })
        .collect();

    Json(FeedResponse {
        loading: feed.loading,
        categories,
        resources,
    })
}
