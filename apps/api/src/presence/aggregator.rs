//! Count aggregator — recomputes the live-user count on every presence
//! snapshot.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::warn;

use crate::models::presence::PresenceRecord;
use crate::store::{DocumentStore, Snapshot, PRESENCE};

use super::active_count;

pub type LiveCountHandle = watch::Receiver<usize>;

/// Spawns the aggregator task. Presence has no seed fallback: if the
/// subscription cannot be established the count simply stays at its
/// last known value (initially zero).
pub fn spawn(store: Arc<dyn DocumentStore>) -> LiveCountHandle {
    let (tx, rx) = watch::channel(0usize);
    tokio::spawn(async move {
        let mut sub = match store.subscribe(PRESENCE, None).await {
            Ok(sub) => sub,
            Err(err) => {
                warn!("presence subscription failed, live count frozen: {err}");
                return;
            }
        };

        recompute(&tx, &sub.latest());
        while sub.changed().await {
            recompute(&tx, &sub.latest());
        }
    });
    rx
}

fn recompute(tx: &watch::Sender<usize>, snapshot: &Snapshot) {
    let records: Vec<PresenceRecord> = snapshot
        .iter()
        .filter_map(PresenceRecord::from_document)
        .collect();
    let now_ms = Utc::now().timestamp_millis();
    tx.send_replace(active_count(&records, now_ms));
}
