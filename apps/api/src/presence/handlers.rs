use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    pub client_id: String,
}

/// POST /api/v1/presence/heartbeat
///
/// One beat on behalf of a browser-held client token. Fire-and-forget:
/// a store failure is logged, never surfaced, so the browser's timer
/// keeps its cadence.
pub async fn handle_heartbeat(
    State(state): State<AppState>,
    Json(req): Json<HeartbeatRequest>,
) -> Result<StatusCode, AppError> {
    if req.client_id.trim().is_empty() {
        return Err(AppError::Validation(
            "clientId must not be empty".to_string(),
        ));
    }
    if let Err(err) = super::beat(state.store.as_ref(), req.client_id.trim()).await {
        warn!("heartbeat write failed: {err}");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct LiveCountResponse {
    pub active: usize,
}

/// GET /api/v1/presence/live
pub async fn handle_live_count(State(state): State<AppState>) -> Json<LiveCountResponse> {
    Json(LiveCountResponse {
        active: *state.live.borrow(),
    })
}
