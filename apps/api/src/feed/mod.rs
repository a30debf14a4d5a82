// Resource feed: pure ranking/filter engine plus the subscription
// watcher that keeps the latest store snapshot in memory.
// No store writes happen here — votes and views live in `catalog`.

pub mod engine;
pub mod handlers;
pub mod links;
pub mod query;
pub mod watcher;

pub use query::{FeedQuery, SortBy};
pub use watcher::{FeedHandle, FeedState};
