use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::errors::AppError;
use crate::models::request::RequestStatus;
use crate::models::resource::NewResource;
use crate::requests;
use crate::state::AppState;

use super::votes::VoteKind;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// POST /api/v1/resources
pub async fn handle_add_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewResource>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_admin(&headers, &state.config)?;
    let id = super::add_resource(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// DELETE /api/v1/resources/:id
pub async fn handle_delete_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    super::delete_resource(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinToggle {
    pub is_pinned: bool,
}

/// PATCH /api/v1/resources/:id/pin
pub async fn handle_toggle_pin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<PinToggle>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    super::set_pinned(state.store.as_ref(), &id, req.is_pinned).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// The vote this browser already holds, if any.
    #[serde(default)]
    pub previous: Option<VoteKind>,
    pub vote: VoteKind,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    /// What the browser should remember as its current vote.
    pub vote: Option<VoteKind>,
}

/// POST /api/v1/resources/:id/vote
pub async fn handle_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let next = super::vote(state.store.as_ref(), &id, req.previous, req.vote).await?;
    Ok(Json(VoteResponse { vote: next }))
}

/// POST /api/v1/resources/:id/view
pub async fn handle_record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    super::record_view(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopResource {
    pub id: String,
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_views: i64,
    pub total_resources: usize,
    pub top_resource: Option<TopResource>,
    pub pending_requests: usize,
    pub live_users: usize,
}

/// GET /api/v1/admin/summary — the dashboard numbers, derived from the
/// current snapshots rather than stored anywhere.
pub async fn handle_admin_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdminSummary>, AppError> {
    require_admin(&headers, &state.config)?;

    let feed = state.feed.borrow().clone();
    let request_list = requests::list_requests(state.store.as_ref()).await?;

    let total_views = feed.resources.iter().map(|r| r.views).sum();
    let top_resource = feed
        .resources
        .iter()
        .max_by_key(|r| r.views)
        .map(|r| TopResource {
            id: r.id.clone(),
            title: r.title.clone(),
            views: r.views,
        });
    let pending_requests = request_list
        .iter()
        .filter(|r| r.status == RequestStatus::Pending)
        .count();

    Ok(Json(AdminSummary {
        total_views,
        total_resources: feed.resources.len(),
        top_resource,
        pending_requests,
        live_users: *state.live.borrow(),
    }))
}
