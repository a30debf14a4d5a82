//! Catalog curation — every mutation of the resources collection.
//!
//! All operations are thin store calls behind the protected-record
//! guard; their effects come back through the feed watcher's next
//! snapshot rather than through return values.

pub mod handlers;
pub mod votes;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::resource::NewResource;
use crate::store::{seed, DocumentStore, WriteFields, RESOURCES};

use self::votes::VoteKind;

/// Rejects mutations against the demo records. A rejected request is a
/// visible validation notice, not a silent no-op, so admins learn why
/// nothing happened.
fn ensure_mutable(id: &str) -> Result<(), AppError> {
    if seed::PROTECTED_IDS.contains(&id) {
        return Err(AppError::Validation(
            "sample resources cannot be modified or deleted".to_string(),
        ));
    }
    Ok(())
}

/// Creates a resource with zeroed counters and unpinned state. Counter
/// and pin values are never accepted from the caller.
pub async fn add_resource(
    store: &dyn DocumentStore,
    new: NewResource,
) -> Result<String, AppError> {
    let title = new.title.trim();
    let description = new.description.trim();
    let url = new.url.trim();
    let category = new.category.trim();
    if title.is_empty() || description.is_empty() || url.is_empty() || category.is_empty() {
        return Err(AppError::Validation(
            "title, description, url and category must not be empty".to_string(),
        ));
    }

    let mut fields = WriteFields::new()
        .set("title", title)
        .set("description", description)
        .set("type", new.kind.as_str())
        .set("url", url)
        .set("category", category)
        .set("addedAt", Utc::now().timestamp_millis())
        .set("likes", 0)
        .set("dislikes", 0)
        .set("views", 0)
        .set("isPinned", false);
    if let Some(thumbnail) = new.thumbnail_url.as_deref().map(str::trim) {
        if !thumbnail.is_empty() {
            fields = fields.set("thumbnailUrl", thumbnail);
        }
    }

    Ok(store.insert(RESOURCES, fields).await?)
}

pub async fn delete_resource(store: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
    ensure_mutable(id)?;
    store.delete(RESOURCES, id).await?;
    Ok(())
}

/// Unconditional pin overwrite — last writer wins, which is fine while
/// a single admin curates.
pub async fn set_pinned(
    store: &dyn DocumentStore,
    id: &str,
    pinned: bool,
) -> Result<(), AppError> {
    ensure_mutable(id)?;
    store
        .update(RESOURCES, id, WriteFields::new().set("isPinned", pinned))
        .await?;
    Ok(())
}

/// Applies one vote toggle: the previous vote (as the voter's browser
/// remembers it) plus the pressed button become a set of counter
/// increments. Returns the voter's next vote state.
pub async fn vote(
    store: &dyn DocumentStore,
    id: &str,
    previous: Option<VoteKind>,
    pressed: VoteKind,
) -> Result<Option<VoteKind>, AppError> {
    ensure_mutable(id)?;
    let (next, deltas) = votes::toggle(previous, pressed);
    for delta in deltas {
        store
            .increment_field(RESOURCES, id, delta.kind.field(), delta.delta)
            .await?;
    }
    Ok(next)
}

pub async fn record_view(store: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
    ensure_mutable(id)?;
    store.increment_field(RESOURCES, id, "views", 1).await?;
    Ok(())
}
