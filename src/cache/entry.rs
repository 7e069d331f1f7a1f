// Cache entry with fetch timestamp.
// Staleness is a predicate checked when the user asks for a refetch, never by a timer.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the data was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create a new entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            fetched_at: Utc::now(),
        }
    }

    /// Time elapsed since the data was fetched.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Check if the entry is older than the staleness window.
    pub fn is_stale(&self, window: Duration) -> bool {
        self.age() > window
    }
}
