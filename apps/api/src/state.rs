use std::sync::Arc;

use crate::assistant::CompletionService;
use crate::config::Config;
use crate::feed::FeedHandle;
use crate::presence::aggregator::LiveCountHandle;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The persistence seam. Everything durable goes through here.
    pub store: Arc<dyn DocumentStore>,
    /// Pluggable AI backend; swapped for a stub in tests.
    pub assistant: Arc<dyn CompletionService>,
    pub config: Config,
    /// Latest resource snapshot, maintained by the feed watcher task.
    pub feed: FeedHandle,
    /// Live-user count, maintained by the presence aggregator task.
    pub live: LiveCountHandle,
}
