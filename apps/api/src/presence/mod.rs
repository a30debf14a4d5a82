//! Presence — the live-user estimator.
//!
//! Two cooperating halves: clients heartbeat their own record every
//! minute, and an aggregator counts records seen within the active
//! window. Records are never deleted; stale clients simply age out of
//! the window. The count is therefore a full scan over every client
//! ever seen — an accepted trade for zero server-side aggregation at
//! the deployment sizes this targets. Do not replace it with a
//! server-side aggregate without revisiting that decision.

pub mod aggregator;
pub mod emitter;
pub mod handlers;

use std::time::Duration;

use crate::models::presence::PresenceRecord;
use crate::store::{DocumentStore, StoreResult, WriteFields, PRESENCE};

/// How recent a heartbeat must be for its client to count as active.
pub const ACTIVE_WINDOW_MS: i64 = 120_000;

/// How often a running client refreshes its own record.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(60);

/// Counts clients whose last heartbeat falls inside the active window.
/// `now_ms` is one wall-clock reading for the whole scan. Records not
/// yet carrying a server-acknowledged timestamp contribute nothing.
pub fn active_count(records: &[PresenceRecord], now_ms: i64) -> usize {
    records
        .iter()
        .filter(|record| match record.last_seen {
            Some(seen) => now_ms - seen < ACTIVE_WINDOW_MS,
            None => false,
        })
        .count()
}

/// Writes one heartbeat for a client token. The timestamp is the
/// store's server clock, never the client's.
pub async fn beat(store: &dyn DocumentStore, client_id: &str) -> StoreResult<()> {
    store
        .upsert_merge(
            PRESENCE,
            client_id,
            WriteFields::new().server_timestamp("lastSeen"),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{read_current, MemoryStore};

    fn record(id: &str, last_seen: Option<i64>) -> PresenceRecord {
        PresenceRecord {
            id: id.to_string(),
            last_seen,
        }
    }

    #[test]
    fn test_active_count_applies_two_minute_window() {
        let now = 1_000_000;
        let records = vec![
            record("fresh", Some(999_000)),  // 1s ago
            record("stale", Some(700_000)),  // 300s ago
        ];
        assert_eq!(active_count(&records, now), 1);
    }

    #[test]
    fn test_record_exactly_at_window_edge_is_stale() {
        let now = 1_000_000;
        let records = vec![record("edge", Some(now - ACTIVE_WINDOW_MS))];
        assert_eq!(active_count(&records, now), 0);
    }

    #[test]
    fn test_record_without_last_seen_counts_zero() {
        let records = vec![record("pending", None), record("fresh", Some(999_000))];
        assert_eq!(active_count(&records, 1_000_000), 1);
    }

    #[tokio::test]
    async fn test_beat_upserts_server_assigned_timestamp() {
        let store = MemoryStore::new();
        beat(&store, "client-a").await.unwrap();
        beat(&store, "client-a").await.unwrap();

        let snapshot = read_current(&store, PRESENCE, None).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "client-a");
        assert!(snapshot[0].data.get("lastSeen").unwrap().as_i64().is_some());
    }
}
