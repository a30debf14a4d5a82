#![allow(dead_code)]

//! Heartbeat emitter — the client half of the presence estimator, for
//! Rust processes embedding the catalog (the browser front end drives
//! the HTTP heartbeat endpoint instead).

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::identity::ClientIdentityProvider;
use crate::store::DocumentStore;

use super::{beat, HEARTBEAT_PERIOD};

/// Beats once on start and every minute thereafter. Writes are
/// fire-and-forget: a failed beat is logged and the timer keeps
/// running, so connectivity blips heal on the next tick. Dropping the
/// emitter aborts the task — the timer must not outlive its owner.
pub struct HeartbeatEmitter {
    task: JoinHandle<()>,
}

impl HeartbeatEmitter {
    pub fn spawn(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn ClientIdentityProvider>,
    ) -> Result<Self> {
        let client_id = identity.get_or_create()?;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HEARTBEAT_PERIOD);
            loop {
                ticker.tick().await;
                if let Err(err) = beat(store.as_ref(), &client_id).await {
                    warn!("heartbeat write failed, retrying next tick: {err}");
                }
            }
        });
        Ok(HeartbeatEmitter { task })
    }

    /// Explicit teardown; dropping does the same.
    pub fn stop(self) {}
}

impl Drop for HeartbeatEmitter {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{
        read_current, DocumentStore, MemoryStore, OrderBy, StoreError, StoreResult, Subscription,
        WriteFields, PRESENCE,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedIdentity(&'static str);

    impl ClientIdentityProvider for FixedIdentity {
        fn get_or_create(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// MemoryStore wrapper whose heartbeat writes can be switched off.
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            FlakyStore {
                inner: MemoryStore::new(),
                fail_writes: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn subscribe(
            &self,
            collection: &str,
            order_by: Option<OrderBy>,
        ) -> StoreResult<Subscription> {
            self.inner.subscribe(collection, order_by).await
        }

        async fn insert(&self, collection: &str, fields: WriteFields) -> StoreResult<String> {
            self.inner.insert(collection, fields).await
        }

        async fn update(
            &self,
            collection: &str,
            id: &str,
            fields: WriteFields,
        ) -> StoreResult<()> {
            self.inner.update(collection, id, fields).await
        }

        async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
            self.inner.delete(collection, id).await
        }

        async fn increment_field(
            &self,
            collection: &str,
            id: &str,
            field: &str,
            delta: i64,
        ) -> StoreResult<()> {
            self.inner.increment_field(collection, id, field, delta).await
        }

        async fn upsert_merge(
            &self,
            collection: &str,
            id: &str,
            fields: WriteFields,
        ) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("offline".to_string()));
            }
            self.inner.upsert_merge(collection, id, fields).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_beats_on_start_and_every_period() {
        let store = Arc::new(MemoryStore::new());
        let mut sub = store.subscribe(PRESENCE, None).await.unwrap();

        let emitter = HeartbeatEmitter::spawn(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::new(FixedIdentity("client-a")),
        )
        .unwrap();

        // Initial beat, then one more as paused time reaches the next tick.
        assert!(sub.changed().await);
        assert!(sub.changed().await);

        let snapshot = read_current(store.as_ref(), PRESENCE, None).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "client-a");

        emitter.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_beat_does_not_kill_the_timer() {
        let store = Arc::new(FlakyStore::new());
        store.fail_writes.store(true, Ordering::SeqCst);
        let mut sub = store.subscribe(PRESENCE, None).await.unwrap();

        let _emitter = HeartbeatEmitter::spawn(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::new(FixedIdentity("client-a")),
        )
        .unwrap();

        // Let the failing initial beat happen, then restore the store.
        tokio::task::yield_now().await;
        store.fail_writes.store(false, Ordering::SeqCst);

        // The next tick still fires and lands a record.
        assert!(sub.changed().await);
        let snapshot = read_current(store.as_ref(), PRESENCE, None).await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_clears_the_timer() {
        let store = Arc::new(MemoryStore::new());
        let mut sub = store.subscribe(PRESENCE, None).await.unwrap();

        let emitter = HeartbeatEmitter::spawn(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::new(FixedIdentity("client-a")),
        )
        .unwrap();

        assert!(sub.changed().await);
        drop(emitter);

        let waited = tokio::time::timeout(HEARTBEAT_PERIOD * 3, sub.changed()).await;
        assert!(waited.is_err(), "no heartbeats may arrive after teardown");
    }
}
