//! Postgres-backed DocumentStore.
//!
//! Documents live in a single `(collection, id, data jsonb)` table;
//! `seq` preserves insertion order for snapshot ties. After every local
//! write the collection is re-read and re-published to subscribers.
//!
//! Known limitation: snapshots are only re-published for writes made
//! through this process. A second API instance writing to the same
//! database would not wake this one's subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use super::{
    spawn_subscription, Document, DocumentStore, OrderBy, Snapshot, StoreError, StoreResult,
    Subscription, WriteFields,
};

pub struct PgStore {
    pool: PgPool,
    publishers: Mutex<HashMap<String, Arc<watch::Sender<Snapshot>>>>,
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl PgStore {
    /// Connects a fresh pool and initializes the store.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(unavailable)?;
        info!("PostgreSQL connection pool established");
        Self::init(pool).await
    }

    /// Wraps an existing pool and ensures the documents table exists.
    pub async fn init(pool: PgPool) -> StoreResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id         TEXT NOT NULL,
                data       JSONB NOT NULL,
                seq        BIGSERIAL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(unavailable)?;

        Ok(PgStore {
            pool,
            publishers: Mutex::new(HashMap::new()),
        })
    }

    fn publisher(&self, collection: &str) -> Arc<watch::Sender<Snapshot>> {
        let mut publishers = self.publishers.lock().expect("publisher lock poisoned");
        Arc::clone(
            publishers
                .entry(collection.to_string())
                .or_insert_with(|| Arc::new(watch::channel(Vec::new()).0)),
        )
    }

    async fn fetch_snapshot(&self, collection: &str) -> StoreResult<Snapshot> {
        let rows = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 ORDER BY seq")
            .bind(collection)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        let mut snapshot = Vec::with_capacity(rows.len());
        for row in rows {
            snapshot.push(Document {
                id: row.try_get("id").map_err(unavailable)?,
                data: row.try_get("data").map_err(unavailable)?,
            });
        }
        Ok(snapshot)
    }

    async fn republish(&self, collection: &str) -> StoreResult<()> {
        let snapshot = self.fetch_snapshot(collection).await?;
        self.publisher(collection).send_replace(snapshot);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn subscribe(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> StoreResult<Subscription> {
        let snapshot = self.fetch_snapshot(collection).await?;
        let publisher = self.publisher(collection);
        // Refresh the channel without waking subscribers that already
        // hold this exact snapshot.
        publisher.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });
        Ok(spawn_subscription(publisher.subscribe(), order_by))
    }

    async fn insert(&self, collection: &str, fields: WriteFields) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let body = Value::Object(fields.resolve(Utc::now().timestamp_millis()));
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        self.republish(collection).await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: WriteFields) -> StoreResult<()> {
        let body = Value::Object(fields.resolve(Utc::now().timestamp_millis()));
        let result =
            sqlx::query("UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .bind(body)
                .execute(&self.pool)
                .await
                .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        self.republish(collection).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        self.republish(collection).await
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<()> {
        // Server-side add, missing field treated as zero, clamped at
        // zero so concurrent un-votes can never drive a counter negative.
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                data,
                ARRAY[$3]::text[],
                to_jsonb(GREATEST(COALESCE((data ->> $3)::bigint, 0) + $4, 0))
            )
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        self.republish(collection).await
    }

    async fn upsert_merge(
        &self,
        collection: &str,
        id: &str,
        fields: WriteFields,
    ) -> StoreResult<()> {
        let body = Value::Object(fields.resolve(Utc::now().timestamp_millis()));
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = documents.data || EXCLUDED.data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        self.republish(collection).await
    }
}
