// In-memory query cache.
// Stores search results and repository pages with fetch timestamps; nothing is persisted.

#![allow(dead_code)]

pub mod entry;
pub mod in_flight;
pub mod repos;
pub mod search;

#[allow(unused_imports)]
pub use entry::CacheEntry;
#[allow(unused_imports)]
pub use repos::{Pages, RepoPagesCache, reached_end};
pub use search::SearchCache;
