//! Cache Statistics Module
//!
//! Tracks hits, misses, writes, invalidations and evictions, plus the janitor
//! and preloader watermarks.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Cache performance metrics. Counters only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Writes
    pub sets: u64,
    /// Entries removed by explicit or pattern invalidation
    pub invalidations: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Current number of entries in the cache
    pub size: usize,
    /// Completion time of the last janitor sweep
    pub last_cleanup: Option<DateTime<Utc>>,
    /// Completion time of the last preload run
    pub last_preload: Option<DateTime<Utc>>,
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

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_cleanup(&mut self, at: DateTime<Utc>) {
        self.last_cleanup = Some(at);
    }

    pub fn record_preload(&mut self, at: DateTime<Utc>) {
        self.last_preload = Some(at);
    }

    /// Updates the size gauge.
    pub fn set_size(&mut self, count: usize) {
        self.size = count;
    }
}
