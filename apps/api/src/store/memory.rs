//! In-memory DocumentStore backend.
//!
//! Reference implementation of the store contract and the test double
//! for everything above the persistence seam. Collections keep
//! insertion order, which is what snapshot ties fall back to.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use super::{
    spawn_subscription, Document, DocumentStore, OrderBy, Snapshot, StoreError, StoreResult,
    Subscription, WriteFields,
};

struct Collection {
    /// (id, body) in insertion order.
    docs: Vec<(String, Value)>,
    publisher: watch::Sender<Snapshot>,
}

impl Collection {
    fn new() -> Self {
        let (publisher, _) = watch::channel(Vec::new());
        Collection {
            docs: Vec::new(),
            publisher,
        }
    }

    fn snapshot(&self) -> Snapshot {
        self.docs
            .iter()
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Value> {
        self.docs
            .iter_mut()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, data)| data)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<T>(&self, name: &str, f: impl FnOnce(&mut Collection) -> T) -> T {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(Collection::new);
        f(collection)
    }
}

fn merge_into(target: &mut Value, fields: serde_json::Map<String, Value>) {
    if let Value::Object(map) = target {
        for (key, value) in fields {
            map.insert(key, value);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> StoreResult<Subscription> {
        // The channel value is kept current by every write, so a fresh
        // receiver starts from the present snapshot without a publish.
        let raw = self.with_collection(collection, |c| c.publisher.subscribe());
        Ok(spawn_subscription(raw, order_by))
    }

    async fn insert(&self, collection: &str, fields: WriteFields) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let body = Value::Object(fields.resolve(Utc::now().timestamp_millis()));
        self.with_collection(collection, |c| {
            c.docs.push((id.clone(), body));
            c.publish();
        });
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: WriteFields) -> StoreResult<()> {
        let resolved = fields.resolve(Utc::now().timestamp_millis());
        self.with_collection(collection, |c| {
            let Some(doc) = c.find_mut(id) else {
                return Err(StoreError::not_found(collection, id));
            };
            merge_into(doc, resolved);
            c.publish();
            Ok(())
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.with_collection(collection, |c| {
            let before = c.docs.len();
            c.docs.retain(|(doc_id, _)| doc_id != id);
            if c.docs.len() == before {
                return Err(StoreError::not_found(collection, id));
            }
            c.publish();
            Ok(())
        })
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<()> {
        self.with_collection(collection, |c| {
            let Some(doc) = c.find_mut(id) else {
                return Err(StoreError::not_found(collection, id));
            };
            let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
            let next = (current + delta).max(0);
            if let Value::Object(map) = doc {
                map.insert(field.to_string(), Value::from(next));
            }
            c.publish();
            Ok(())
        })
    }

    async fn upsert_merge(
        &self,
        collection: &str,
        id: &str,
        fields: WriteFields,
    ) -> StoreResult<()> {
        let resolved = fields.resolve(Utc::now().timestamp_millis());
        self.with_collection(collection, |c| {
            match c.find_mut(id) {
                Some(doc) => merge_into(doc, resolved),
                None => c.docs.push((id.to_string(), Value::Object(resolved))),
            }
            c.publish();
        });
        Ok(())
    }
}
