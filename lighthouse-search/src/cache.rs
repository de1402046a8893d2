//! Bounded per-field cache of query results.
//!
//! Each field index owns one [`SearchCache`] mapping a raw query string to
//! the ranked matches computed for it. Entries are kept in insertion order
//! and evicted first-in first-out, one entry per `put`.
//!
//! The map and the order queue live behind a single `std::sync::Mutex`
//! (held only for the map/queue update, never across an await point), so
//! concurrent queries against the same field cannot leave the two out of
//! step. Caches of different fields never share a lock.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::ScoredMatch;

/// Default number of queries cached per field.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Query → matches cache with insertion-order eviction.
#[derive(Debug)]
pub struct SearchCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Vec<ScoredMatch>>,
    /// Queries from oldest (front) to newest (back). Always holds exactly
    /// the keys of `entries`, each once.
    order: VecDeque<String>,
}

impl SearchCache {
    /// Create an empty cache holding up to `capacity` queries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Look up cached matches for `query`.
    ///
    /// Returns `Some(matches)` on hit, `None` on miss. Reads never change
    /// recency.
    pub fn get(&self, query: &str) -> Option<Vec<ScoredMatch>> {
        self.lock().entries.get(query).cloned()
    }

    /// Insert or refresh the matches for `query`, making it the newest entry.
    ///
    /// If the cache is at capacity, or `query` is already cached, the single
    /// oldest entry is evicted first. A refresh therefore evicts the oldest
    /// entry even when the cache has room; when the oldest entry is `query`
    /// itself it is simply re-inserted.
    ///
    /// Returns the evicted query, if any.
    pub fn put(&self, query: impl Into<String>, matches: Vec<ScoredMatch>) -> Option<String> {
        let query = query.into();
        let mut state = self.lock();

        let refresh = state.entries.contains_key(&query);
        let mut evicted = None;
        if refresh || state.entries.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }
        if refresh {
            if let Some(pos) = state.order.iter().position(|key| *key == query) {
                state.order.remove(pos);
            }
        }

        state.order.push_back(query.clone());
        state.entries.insert(query, matches);
        evicted
    }

    /// Returns `true` if `query` is cached.
    pub fn contains(&self, query: &str) -> bool {
        self.lock().entries.contains_key(query)
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached queries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached queries from oldest to newest.
    pub fn queries(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // No critical section can panic between the map and order updates.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}
