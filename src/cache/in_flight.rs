// In-flight request deduplication.
// Maps a key to a shared in-progress fetch so concurrent callers attach to one request.

use std::collections::HashMap;
use std::hash::Hash;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;

use crate::error::Result;

/// Handle to a fetch that any number of callers can await.
pub type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

/// Registry of fetches currently in progress, keyed by request.
///
/// Lives inside a cache's locked state; callers clone a handle out of the
/// lock and await it after releasing the lock.
pub struct InFlight<K, V> {
    pending: HashMap<K, SharedFetch<V>>,
}

impl<K, V> Default for InFlight<K, V> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K, V> InFlight<K, V>
where
    K: Eq + Hash,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pending handle for `key`, or start a new fetch.
    ///
    /// The second value is true when this call started the fetch.
    pub fn join_or_start<F>(&mut self, key: K, start: F) -> (SharedFetch<V>, bool)
    where
        F: FnOnce() -> BoxFuture<'static, Result<V>>,
    {
        if let Some(handle) = self.pending.get(&key) {
            return (handle.clone(), false);
        }
        let handle = start().shared();
        self.pending.insert(key, handle.clone());
        (handle, true)
    }

    /// Remove the handle for `key` if it is still `handle`.
    ///
    /// Returns true for exactly one of the callers that awaited the same
    /// handle; that caller records the result.
    pub fn finish(&mut self, key: &K, handle: &SharedFetch<V>) -> bool {
        match self.pending.get(key) {
            Some(current) if current.ptr_eq(handle) => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Whether a fetch for `key` is in progress.
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of fetches in progress.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use futures::future;

    use super::*;

    fn value(v: u32) -> BoxFuture<'static, Result<u32>> {
        future::ready(Ok(v)).boxed()
    }

    #[tokio::test]
    async fn test_second_caller_joins_pending_fetch() {
        let mut in_flight: InFlight<&str, u32> = InFlight::new();

        let (first, started) = in_flight.join_or_start("octocat", || value(7));
        assert!(started);

        let (second, started) = in_flight.join_or_start("octocat", || value(99));
        assert!(!started);
        assert!(first.ptr_eq(&second));
        assert_eq!(in_flight.len(), 1);

        assert_eq!(second.clone().await, Ok(7));
        assert_eq!(first.clone().await, Ok(7));

        assert!(in_flight.finish(&"octocat", &second));
        assert!(!in_flight.finish(&"octocat", &first));
        assert!(in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_finish_ignores_replaced_handle() {
        let mut in_flight: InFlight<&str, u32> = InFlight::new();

        let (old, _) = in_flight.join_or_start("a", || value(1));
        assert!(in_flight.finish(&"a", &old));

        let (new, started) = in_flight.join_or_start("a", || value(2));
        assert!(started);
        assert!(!in_flight.finish(&"a", &old));
        assert!(in_flight.is_pending(&"a"));
        assert_eq!(new.await, Ok(2));
    }
}
