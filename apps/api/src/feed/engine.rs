//! Feed engine — pure transformation from a resource snapshot plus
//! view-state to the ordered list the catalog renders.
//!
//! No I/O and no mutation: votes and views are separate store
//! operations whose effects re-enter here through the next snapshot.

use crate::models::resource::Resource;

use super::query::{FeedQuery, SortBy, ALL_CATEGORY};

/// Filters and orders a snapshot for display.
///
/// A resource survives the filter iff the search term is a
/// case-insensitive substring of its title or description, and the
/// category filter is "All" or an exact category match. Pinned
/// resources always precede unpinned ones regardless of sort mode;
/// within each partition the chosen sort applies, and ties keep the
/// snapshot's own order (the sort is stable).
pub fn render(resources: &[Resource], query: &FeedQuery) -> Vec<Resource> {
    let needle = query.search.to_lowercase();

    let mut out: Vec<Resource> = resources
        .iter()
        .filter(|r| {
            let matches_search = r.title.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle);
            let matches_category = query.category == ALL_CATEGORY || r.category == query.category;
            matches_search && matches_category
        })
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        b.is_pinned.cmp(&a.is_pinned).then_with(|| match query.sort {
            SortBy::Newest => b.added_at.cmp(&a.added_at),
            SortBy::Oldest => a.added_at.cmp(&b.added_at),
            SortBy::Popular => b.likes.cmp(&a.likes),
            SortBy::Views => b.views.cmp(&a.views),
        })
    });

    out
}

/// The selectable category list: "All" followed by the distinct
/// categories of the snapshot in first-occurrence order.
pub fn categories(resources: &[Resource]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORY.to_string()];
    for resource in resources {
        if !out[1..].contains(&resource.category) {
            out.push(resource.category.clone());
        }
    }
    out
}
