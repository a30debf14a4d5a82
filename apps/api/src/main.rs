mod assistant;
mod auth;
mod catalog;
mod config;
mod errors;
mod feed;
mod identity;
mod models;
mod presence;
mod requests;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::{gemini::GeminiClient, CompletionService};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting StudySphere API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the document store over PostgreSQL
    let store: Arc<dyn DocumentStore> = Arc::new(PgStore::connect(&config.database_url).await?);
    info!("Document store ready");

    // Initialize the AI assistant backend
    let assistant: Arc<dyn CompletionService> =
        Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    info!(
        "Assistant client initialized (model: {})",
        assistant::gemini::MODEL
    );

    // Singleton watcher tasks own the push subscriptions; handlers only
    // read their channels.
    let feed = feed::watcher::spawn(Arc::clone(&store));
    let live = presence::aggregator::spawn(Arc::clone(&store));

    // Build app state
    let state = AppState {
        store,
        assistant,
        config: config.clone(),
        feed,
        live,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
