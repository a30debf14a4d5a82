//! Feed watcher — owns the resource subscription and mirrors the latest
//! snapshot into a watch channel the handlers read from.
//!
//! Loading is a property of the subscription, not of the engine: the
//! channel starts in the loading state and leaves it with the first
//! snapshot (or the seed fallback), so "no matches" and "not loaded
//! yet" stay distinguishable.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, warn};

use crate::models::resource::Resource;
use crate::store::{seed, DocumentStore, OrderBy, Snapshot, RESOURCES};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub loading: bool,
    pub resources: Vec<Resource>,
}

impl FeedState {
    /// The pre-first-snapshot state.
    pub fn loading() -> Self {
        FeedState {
            loading: true,
            resources: Vec::new(),
        }
    }
}

pub type FeedHandle = watch::Receiver<FeedState>;

/// Spawns the watcher task and returns the handle the rest of the
/// application reads. If the subscription cannot be established the
/// feed settles on the seed dataset instead of an empty error state.
pub fn spawn(store: Arc<dyn DocumentStore>) -> FeedHandle {
    let (tx, rx) = watch::channel(FeedState::loading());
    tokio::spawn(async move {
        let mut sub = match store
            .subscribe(RESOURCES, Some(OrderBy::desc("addedAt")))
            .await
        {
            Ok(sub) => sub,
            Err(err) => {
                error!("resource subscription failed, serving seed data: {err}");
                tx.send_replace(FeedState {
                    loading: false,
                    resources: seed::resources(),
                });
                return;
            }
        };

        publish(&tx, sub.latest());
        while sub.changed().await {
            publish(&tx, sub.latest());
        }
    });
    rx
}

fn publish(tx: &watch::Sender<FeedState>, snapshot: Snapshot) {
    let mut resources = Vec::with_capacity(snapshot.len());
    for doc in &snapshot {
        match Resource::from_document(doc) {
            Some(resource) => resources.push(resource),
            None => warn!("skipping malformed resource document '{}'", doc.id),
        }
    }

    // An empty collection renders the seed dataset, matching the
    // fresh-deployment experience.
    if resources.is_empty() {
        resources = seed::resources();
    }

    tx.send_replace(FeedState {
        loading: false,
        resources,
    });
}
