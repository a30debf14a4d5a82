//! Student content requests: anyone may submit, only admins curate.

pub mod handlers;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::request::{RequestStatus, ResourceRequest};
use crate::store::{read_current, DocumentStore, OrderBy, WriteFields, REQUESTS};

pub async fn add_request(
    store: &dyn DocumentStore,
    title: &str,
    details: &str,
) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(
            "request title must not be empty".to_string(),
        ));
    }

    let fields = WriteFields::new()
        .set("title", title)
        .set("details", details.trim())
        .set("status", RequestStatus::Pending.as_str())
        .set("createdAt", Utc::now().timestamp_millis());
    Ok(store.insert(REQUESTS, fields).await?)
}

/// Newest-first request list, read as a one-shot snapshot.
pub async fn list_requests(store: &dyn DocumentStore) -> Result<Vec<ResourceRequest>, AppError> {
    let snapshot = read_current(store, REQUESTS, Some(OrderBy::desc("createdAt"))).await?;
    Ok(snapshot
        .iter()
        .filter_map(ResourceRequest::from_document)
        .collect())
}

/// Unconditional status overwrite — last writer wins.
pub async fn set_status(
    store: &dyn DocumentStore,
    id: &str,
    status: RequestStatus,
) -> Result<(), AppError> {
    store
        .update(REQUESTS, id, WriteFields::new().set("status", status.as_str()))
        .await?;
    Ok(())
}

pub async fn delete_request(store: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
    store.delete(REQUESTS, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_new_request_starts_pending() {
        let store = MemoryStore::new();
        add_request(&store, "Organic chemistry past papers", "Last three years")
            .await
            .unwrap();

        let requests = list_requests(&store).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, RequestStatus::Pending);
        assert_eq!(requests[0].title, "Organic chemistry past papers");
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let store = MemoryStore::new();
        let err = add_request(&store, "  ", "details").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_flip_and_delete() {
        let store = MemoryStore::new();
        let id = add_request(&store, "Physics formula sheet", "").await.unwrap();

        set_status(&store, &id, RequestStatus::Completed).await.unwrap();
        let requests = list_requests(&store).await.unwrap();
        assert_eq!(requests[0].status, RequestStatus::Completed);

        delete_request(&store, &id).await.unwrap();
        assert!(list_requests(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryStore::new();
        // Stamp explicitly so ordering doesn't depend on the clock.
        for (title, created_at) in [("older", 100_i64), ("newer", 200)] {
            store
                .insert(
                    REQUESTS,
                    WriteFields::new()
                        .set("title", title)
                        .set("details", "")
                        .set("status", "pending")
                        .set("createdAt", created_at),
                )
                .await
                .unwrap();
        }

        let requests = list_requests(&store).await.unwrap();
        let titles: Vec<&str> = requests.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_mutating_missing_request_is_not_found() {
        let store = MemoryStore::new();
        let err = set_status(&store, "nope", RequestStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
