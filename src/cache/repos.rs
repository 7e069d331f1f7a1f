// Repository page cache keyed by username.
// Pages are appended in order; duplicate requests for the same page share one fetch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tracing::debug;

use crate::error::{ExplorerError, Result};
use crate::github::Repository;

use super::entry::CacheEntry;
use super::in_flight::InFlight;

/// Fetched pages for one user, in page order.
pub type Pages = Vec<Vec<Repository>>;

#[derive(Default)]
struct RepoState {
    entries: HashMap<String, CacheEntry<Pages>>,
    /// Bumped by `invalidate`; pages fetched under an older value are dropped.
    generations: HashMap<String, u64>,
    in_flight: InFlight<(String, u64, u32), Vec<Repository>>,
}

impl RepoState {
    fn generation(&self, username: &str) -> u64 {
        self.generations.get(username).copied().unwrap_or(0)
    }

    /// Append `repos` as page `page` if it directly follows the stored pages.
    fn append(&mut self, username: &str, page: u32, repos: Vec<Repository>) {
        let stored = self
            .entries
            .get(username)
            .map_or(0, |entry| entry.data.len() as u32);
        if stored + 1 != page {
            debug!(username, page, "dropping page that no longer follows the cache");
            return;
        }
        self.entries
            .entry(username.to_string())
            .or_insert_with(|| CacheEntry::new(Vec::new()))
            .data
            .push(repos);
    }
}

/// Shared handle to the per-user repository page cache.
#[derive(Clone)]
pub struct RepoPagesCache {
    state: Arc<Mutex<RepoState>>,
    per_page: u32,
    stale_after: Duration,
}

/// True when `pages` ends with a page shorter than `per_page`.
pub fn reached_end(pages: &[Vec<Repository>], per_page: u32) -> bool {
    pages
        .last()
        .is_some_and(|page| page.len() < per_page as usize)
}

impl RepoPagesCache {
    pub fn new(per_page: u32, stale_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RepoState::default())),
            per_page,
            stale_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RepoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page size used for every request.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Return page `page` (1-indexed) of `username`'s repositories.
    ///
    /// Already fetched pages are served from the cache. The next page is
    /// fetched with `fetch`, shared between concurrent callers, and appended.
    /// A page past a short page is known to be empty and is not requested.
    pub async fn load_page<F, Fut>(
        &self,
        username: &str,
        page: u32,
        fetch: F,
    ) -> Result<Vec<Repository>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Repository>>> + Send + 'static,
    {
        let (key, handle) = {
            let mut state = self.lock();
            let key = (username.to_string(), state.generation(username), page);
            let pages = state.entries.get(username).map(|entry| &entry.data);
            let fetched = pages.map_or(0, Vec::len) as u32;

            if page >= 1 && page <= fetched {
                debug!(username, page, "serving cached repository page");
                return Ok(pages
                    .and_then(|p| p.get(page as usize - 1))
                    .cloned()
                    .unwrap_or_default());
            }
            if page != fetched + 1 {
                return Err(ExplorerError::PageOutOfOrder {
                    requested: page,
                    next: fetched + 1,
                });
            }
            if pages.is_some_and(|p| reached_end(p, self.per_page)) {
                return Ok(Vec::new());
            }

            let (handle, started) = state.in_flight.join_or_start(key.clone(), || fetch().boxed());
            if !started {
                debug!(username, page, "joining in-flight repository fetch");
            }
            (key, handle)
        };

        let result = handle.clone().await;

        let mut state = self.lock();
        if state.in_flight.finish(&key, &handle) {
            if state.generation(username) != key.1 {
                debug!(username, page, "dropping page fetched before invalidation");
            } else if let Ok(repos) = &result {
                state.append(username, page, repos.clone());
            }
        }
        result
    }

    /// Snapshot of the pages fetched for `username`.
    pub fn pages(&self, username: &str) -> Option<Pages> {
        self.lock()
            .entries
            .get(username)
            .map(|entry| entry.data.clone())
    }

    /// Number of pages fetched for `username`.
    pub fn fetched_count(&self, username: &str) -> usize {
        self.lock()
            .entries
            .get(username)
            .map_or(0, |entry| entry.data.len())
    }

    /// Whether `username`'s pages are older than the staleness window.
    pub fn is_stale(&self, username: &str) -> bool {
        self.lock()
            .entries
            .get(username)
            .is_some_and(|entry| entry.is_stale(self.stale_after))
    }

    /// Drop every cached page for `username`.
    pub fn invalidate(&self, username: &str) {
        let mut state = self.lock();
        *state.generations.entry(username.to_string()).or_default() += 1;
        if state.entries.remove(username).is_some() {
            debug!(username, "repository pages invalidated");
        }
    }
}
