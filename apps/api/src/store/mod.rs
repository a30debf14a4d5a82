//! DocumentStore — the single persistence seam of the service.
//!
//! ARCHITECTURAL RULE: no other module talks to a database directly.
//! Everything durable goes through this trait, so the whole application
//! can run against the in-memory backend in tests.
//!
//! The store is push-based: `subscribe` delivers the current snapshot
//! immediately and every subsequent one until the subscription is
//! cancelled. Rapid writes may be coalesced — consumers only ever see
//! the latest snapshot, never a guaranteed sequence of intermediates.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const RESOURCES: &str = "resources";
pub const REQUESTS: &str = "requests";
pub const PRESENCE: &str = "presence";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },
}

impl StoreError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single stored document: opaque id plus a JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// A complete point-in-time copy of one collection.
pub type Snapshot = Vec<Document>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    #[allow(dead_code)]
    pub fn asc(field: &str) -> Self {
        OrderBy {
            field: field.to_string(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: &str) -> Self {
        OrderBy {
            field: field.to_string(),
            direction: Direction::Descending,
        }
    }
}

/// A field value in a write. `ServerTimestamp` is resolved to the
/// store's own clock (epoch millis) at write time, so client clocks
/// never leak into stored timestamps.
#[derive(Debug, Clone)]
pub enum WriteValue {
    Json(Value),
    ServerTimestamp,
}

/// Ordered field set for a write.
#[derive(Debug, Clone, Default)]
pub struct WriteFields(BTreeMap<String, WriteValue>);

impl WriteFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), WriteValue::Json(value.into()));
        self
    }

    pub fn server_timestamp(mut self, key: &str) -> Self {
        self.0.insert(key.to_string(), WriteValue::ServerTimestamp);
        self
    }

    /// Resolves sentinel values against the given clock reading and
    /// returns a plain JSON object ready to merge or insert.
    pub(crate) fn resolve(&self, now_ms: i64) -> serde_json::Map<String, Value> {
        self.0
            .iter()
            .map(|(key, value)| {
                let resolved = match value {
                    WriteValue::Json(v) => v.clone(),
                    WriteValue::ServerTimestamp => Value::from(now_ms),
                };
                (key.clone(), resolved)
            })
            .collect()
    }
}

/// Push-based snapshot feed for one collection.
///
/// The receiver holds the current snapshot from the moment of
/// subscription; `changed` resolves on each subsequent publication.
/// Cancelling (or dropping) detaches the subscriber — no further
/// snapshots are observed, including through cloned receivers.
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
    task: tokio::task::JoinHandle<()>,
}

impl Subscription {
    /// The latest snapshot delivered so far.
    pub fn latest(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next snapshot. Returns false once the subscription
    /// has been torn down.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// A clonable view onto the feed; stops updating after cancel.
    #[allow(dead_code)]
    pub fn receiver(&self) -> watch::Receiver<Snapshot> {
        self.rx.clone()
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Bridges a backend's raw per-collection channel into a per-subscriber
/// channel with the requested ordering applied.
pub(crate) fn spawn_subscription(
    mut raw: watch::Receiver<Snapshot>,
    order_by: Option<OrderBy>,
) -> Subscription {
    let initial = sort_snapshot(raw.borrow().clone(), order_by.as_ref());
    let (tx, rx) = watch::channel(initial);
    let task = tokio::spawn(async move {
        while raw.changed().await.is_ok() {
            let snapshot = sort_snapshot(raw.borrow().clone(), order_by.as_ref());
            tx.send_replace(snapshot);
        }
    });
    Subscription { rx, task }
}

/// Stable sort by a JSON field. Documents missing the field sort last
/// in either direction, so partially-written records don't jump ahead.
pub(crate) fn sort_snapshot(mut snapshot: Snapshot, order_by: Option<&OrderBy>) -> Snapshot {
    let Some(order) = order_by else {
        return snapshot;
    };
    snapshot.sort_by(|a, b| {
        let av = a.data.get(&order.field);
        let bv = b.data.get(&order.field);
        match (av, bv) {
            (Some(a), Some(b)) => {
                let ord = compare_json(a, b);
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    snapshot
}

fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Starts a push subscription on a collection. The current snapshot
    /// is available on the returned handle immediately.
    async fn subscribe(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> StoreResult<Subscription>;

    /// Inserts a new document and returns its server-assigned id.
    async fn insert(&self, collection: &str, fields: WriteFields) -> StoreResult<String>;

    /// Merges fields into an existing document. `NotFound` if absent.
    async fn update(&self, collection: &str, id: &str, fields: WriteFields) -> StoreResult<()>;

    /// Removes a document. `NotFound` if absent.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Atomically adds `delta` to a numeric field, treating a missing
    /// field as zero and clamping the result at zero.
    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<()>;

    /// Creates the document if absent, merges fields if present. Used
    /// for heartbeats, where the client supplies its own id.
    async fn upsert_merge(&self, collection: &str, id: &str, fields: WriteFields)
        -> StoreResult<()>;
}

/// One-shot read: subscribe, take the immediately-delivered snapshot,
/// cancel.
pub async fn read_current(
    store: &dyn DocumentStore,
    collection: &str,
    order_by: Option<OrderBy>,
) -> StoreResult<Snapshot> {
    let sub = store.subscribe(collection, order_by).await?;
    let snapshot = sub.latest();
    sub.cancel();
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, data: Value) -> Document {
        Document {
            id: id.to_string(),
            data,
        }
    }

    #[test]
    fn test_sort_snapshot_descending_numbers() {
        let snapshot = vec![
            doc("a", json!({"addedAt": 100})),
            doc("b", json!({"addedAt": 300})),
            doc("c", json!({"addedAt": 200})),
        ];
        let sorted = sort_snapshot(snapshot, Some(&OrderBy::desc("addedAt")));
        let ids: Vec<&str> = sorted.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_snapshot_missing_field_sorts_last() {
        let snapshot = vec![
            doc("a", json!({})),
            doc("b", json!({"addedAt": 300})),
            doc("c", json!({"addedAt": 500})),
        ];
        let sorted = sort_snapshot(snapshot, Some(&OrderBy::desc("addedAt")));
        let ids: Vec<&str> = sorted.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let snapshot = vec![
            doc("a", json!({})),
            doc("b", json!({"addedAt": 300})),
            doc("c", json!({"addedAt": 500})),
        ];
        let sorted = sort_snapshot(snapshot, Some(&OrderBy::asc("addedAt")));
        let ids: Vec<&str> = sorted.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_snapshot_ties_keep_input_order() {
        let snapshot = vec![
            doc("first", json!({"addedAt": 100})),
            doc("second", json!({"addedAt": 100})),
            doc("third", json!({"addedAt": 100})),
        ];
        let sorted = sort_snapshot(snapshot, Some(&OrderBy::desc("addedAt")));
        let ids: Vec<&str> = sorted.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_resolve_substitutes_server_timestamp() {
        let fields = WriteFields::new()
            .set("title", "Algebra")
            .server_timestamp("lastSeen");
        let resolved = fields.resolve(42);
        assert_eq!(resolved.get("title"), Some(&json!("Algebra")));
        assert_eq!(resolved.get("lastSeen"), Some(&json!(42)));
    }
}
