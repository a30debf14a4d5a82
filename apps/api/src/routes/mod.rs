pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{assistant, catalog, feed, presence, requests};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resource feed & curation
        .route(
            "/api/v1/resources",
            get(feed::handlers::handle_feed).post(catalog::handlers::handle_add_resource),
        )
        .route(
            "/api/v1/resources/:id",
            delete(catalog::handlers::handle_delete_resource),
        )
        .route(
            "/api/v1/resources/:id/pin",
            patch(catalog::handlers::handle_toggle_pin),
        )
        .route(
            "/api/v1/resources/:id/vote",
            post(catalog::handlers::handle_vote),
        )
        .route(
            "/api/v1/resources/:id/view",
            post(catalog::handlers::handle_record_view),
        )
        // Student requests
        .route(
            "/api/v1/requests",
            get(requests::handlers::handle_list).post(requests::handlers::handle_submit),
        )
        .route(
            "/api/v1/requests/:id/status",
            patch(requests::handlers::handle_set_status),
        )
        .route(
            "/api/v1/requests/:id",
            delete(requests::handlers::handle_delete),
        )
        // Presence
        .route(
            "/api/v1/presence/heartbeat",
            post(presence::handlers::handle_heartbeat),
        )
        .route(
            "/api/v1/presence/live",
            get(presence::handlers::handle_live_count),
        )
        // Assistant
        .route(
            "/api/v1/assistant/chat",
            post(assistant::handlers::handle_chat),
        )
        .route(
            "/api/v1/assistant/vision",
            post(assistant::handlers::handle_vision),
        )
        // Admin dashboard
        .route(
            "/api/v1/admin/summary",
            get(catalog::handlers::handle_admin_summary),
        )
        .with_state(state)
}
