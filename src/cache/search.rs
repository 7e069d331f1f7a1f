// User search cache keyed by submitted query.
// Serves fresh results on re-submit and refetches stale or failed ones.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tracing::debug;

use crate::error::Result;
use crate::github::User;

use super::entry::CacheEntry;
use super::in_flight::InFlight;

#[derive(Default)]
struct SearchState {
    entries: HashMap<String, CacheEntry<Result<Vec<User>>>>,
    in_flight: InFlight<String, Vec<User>>,
}

/// Shared handle to the search results cache.
#[derive(Clone)]
pub struct SearchCache {
    state: Arc<Mutex<SearchState>>,
    stale_after: Duration,
}

impl SearchCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(SearchState::default())),
            stale_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve a submitted query.
    ///
    /// A fresh successful entry is returned as is. A missing, stale or failed
    /// entry triggers `fetch`; concurrent submits of the same query share one
    /// request. The outcome, success or error, is recorded with its time.
    pub async fn submit<F, Fut>(&self, query: &str, fetch: F) -> Result<Vec<User>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<User>>> + Send + 'static,
    {
        let key = query.to_string();
        let handle = {
            let mut state = self.lock();
            if let Some(entry) = state.entries.get(&key) {
                if let (Ok(users), false) = (&entry.data, entry.is_stale(self.stale_after)) {
                    debug!(query, "serving cached search");
                    return Ok(users.clone());
                }
            }
            let (handle, started) = state
                .in_flight
                .join_or_start(key.clone(), || fetch().boxed());
            if !started {
                debug!(query, "joining in-flight search");
            }
            handle
        };

        let result = handle.clone().await;

        let mut state = self.lock();
        if state.in_flight.finish(&key, &handle) {
            state.entries.insert(key, CacheEntry::new(result.clone()));
        }
        result
    }

    /// Last recorded outcome for `query`, if any.
    pub fn peek(&self, query: &str) -> Option<CacheEntry<Result<Vec<User>>>> {
        self.lock().entries.get(query).cloned()
    }

    /// Whether a search for `query` is in progress.
    pub fn is_fetching(&self, query: &str) -> bool {
        self.lock().in_flight.is_pending(&query.to_string())
    }
}
