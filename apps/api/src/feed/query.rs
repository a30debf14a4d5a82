use serde::{Deserialize, Serialize};

/// The category filter value meaning "no filter".
pub const ALL_CATEGORY: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    Popular,
    Views,
}

/// Immutable view-state for the feed: search term, category filter and
/// sort mode. Doubles as the query-string extractor for the feed
/// endpoint, so URL state and engine input are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedQuery {
    pub search: String,
    pub category: String,
    pub sort: SortBy,
}

impl Default for FeedQuery {
    fn default() -> Self {
        FeedQuery {
            search: String::new(),
            category: ALL_CATEGORY.to_string(),
            sort: SortBy::default(),
        }
    }
}

/// A user action against the feed view-state. Embedding UIs drive
/// their state through this; the HTTP surface arrives at the same
/// value through the query string instead.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    SetSearch(String),
    SetCategory(String),
    SetSort(SortBy),
}

impl FeedQuery {
    /// The single update function: every user action produces the next
    /// view-state value from the previous one.
    #[allow(dead_code)]
    pub fn apply(self, action: FeedAction) -> FeedQuery {
        match action {
            FeedAction::SetSearch(search) => FeedQuery { search, ..self },
            FeedAction::SetCategory(category) => FeedQuery { category, ..self },
            FeedAction::SetSort(sort) => FeedQuery { sort, ..self },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_all_newest() {
        let query = FeedQuery::default();
        assert_eq!(query.search, "");
        assert_eq!(query.category, ALL_CATEGORY);
        assert_eq!(query.sort, SortBy::Newest);
    }

    #[test]
    fn test_apply_replaces_one_field_at_a_time() {
        let query = FeedQuery::default()
            .apply(FeedAction::SetSearch("calculus".to_string()))
            .apply(FeedAction::SetSort(SortBy::Popular));
        assert_eq!(query.search, "calculus");
        assert_eq!(query.sort, SortBy::Popular);
        assert_eq!(query.category, ALL_CATEGORY);

        let query = query.apply(FeedAction::SetCategory("History".to_string()));
        assert_eq!(query.category, "History");
        assert_eq!(query.search, "calculus");
    }

    #[test]
    fn test_sort_by_deserializes_from_lowercase() {
        let sort: SortBy = serde_json::from_str("\"popular\"").unwrap();
        assert_eq!(sort, SortBy::Popular);
    }
}
