use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::errors::AppError;
use crate::models::request::{RequestStatus, ResourceRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub title: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// POST /api/v1/requests
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = super::add_request(state.store.as_ref(), &req.title, &req.details).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /api/v1/requests
pub async fn handle_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ResourceRequest>>, AppError> {
    require_admin(&headers, &state.config)?;
    Ok(Json(super::list_requests(state.store.as_ref()).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

/// PATCH /api/v1/requests/:id/status
pub async fn handle_set_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    super::set_status(state.store.as_ref(), &id, req.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/requests/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    super::delete_request(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
