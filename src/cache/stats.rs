//! Cache Statistics Module
//!
//! Tracks lookups, insertions and capacity-driven evictions.

use serde::Serialize;

// == Cache Stats ==
/// Cache performance counters.
///
/// Only promoting reads (`get`, `get_mut`) count as hits or misses; `fetch`,
/// `peek` and iteration are pure observation and leave the counters alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of promoting reads that found their key
    pub hits: u64,
    /// Number of promoting reads that did not
    pub misses: u64,
    /// Number of new keys written
    pub inserts: u64,
    /// Number of entries removed to respect the capacity
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
