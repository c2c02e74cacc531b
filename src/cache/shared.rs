//! Shared Cache Handle
//!
//! `OperatorCache` is the cloneable, thread-safe face of the cache. Every
//! operation takes the store mutex once, never across an await point.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

use crate::cache::store::Renewal;
use crate::cache::{keys, CacheStats, CacheStore, Cacheable};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Thread-safe operator cache.
#[derive(Debug, Clone)]
pub struct OperatorCache {
    store: Arc<Mutex<CacheStore>>,
    renewal_window: Duration,
}

impl OperatorCache {
    /// Creates a cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize, default_ttl: Duration, renewal_window: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(max_entries, default_ttl))),
            renewal_window,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_entries,
            config.default_ttl(),
            config.renewal_window(),
        )
    }

    // == Read / Write ==
    /// Returns the live value under `key` as `T`.
    ///
    /// An entry holding a different payload variant is reported as a miss
    /// and left in place.
    pub fn get<T: Cacheable>(&self, key: &str) -> Option<T> {
        self.store.lock().get_as(key)
    }

    /// Stores `value` under `key` for `ttl`, or the default TTL when `None`.
    pub fn set<T: Cacheable>(&self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let key = key.into();
        let value = value.into_cache_value();

        let evicted = self.store.lock().set(key, value, ttl);
        if evicted > 0 {
            debug!("Cache at capacity, evicted {} entries", evicted);
        }
    }

    // == Invalidation ==
    /// Removes the entry under `key`. Returns true if one was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    /// Removes every key matching the regular expression `pattern`.
    ///
    /// Patterns are expected to be fixed constants such as
    /// [`keys::LIST_KEYS_PATTERN`]; one that does not compile is rejected.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.invalidate_matching(&regex))
    }

    /// Removes every key matching a precompiled pattern.
    pub fn invalidate_matching(&self, pattern: &Regex) -> usize {
        let removed = self.store.lock().invalidate_matching(pattern);
        debug!("Invalidated {} entries matching {}", removed, pattern);
        removed
    }

    /// Clears the whole cache. Returns the number of entries removed.
    pub fn invalidate_all(&self) -> usize {
        self.store.lock().clear()
    }

    // == Renewal ==
    /// Checks that the entity under `entity_key` is present and live,
    /// extending its expiry by one default TTL when it is close to expiring.
    ///
    /// The value is not re-fetched. Listing and activity keys are never
    /// renewed; for them this is a plain liveness check.
    pub fn verify_and_renew(&self, entity_key: &str) -> bool {
        let mut store = self.store.lock();

        if !keys::is_entity_key(entity_key) {
            debug!("Refusing to renew non-entity key {}", entity_key);
            return store.peek(entity_key).is_some();
        }

        let extension = store.default_ttl();
        match store.renew(entity_key, self.renewal_window, extension) {
            Renewal::Absent => false,
            Renewal::Fresh | Renewal::Renewed => true,
        }
    }

    // == Janitor Support ==
    /// Keys whose entries have expired, collected under one lock.
    pub fn expired_keys(&self) -> Vec<String> {
        self.store.lock().expired_keys()
    }

    /// Removes the given keys that are still expired under one lock.
    pub fn remove_expired(&self, expired: &[String]) -> usize {
        let mut store = self.store.lock();
        expired.iter().filter(|key| store.remove_if_expired(key)).count()
    }

    pub fn mark_cleanup(&self) {
        self.store.lock().mark_cleanup(Utc::now());
    }

    pub fn mark_preload(&self) {
        self.store.lock().mark_preload(Utc::now());
    }

    // == Introspection ==
    /// Snapshot of the counters, size gauge and watermarks.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Remaining lifetime of the live entry under `key`, without touching stats.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.store.lock().peek(key).map(|entry| entry.ttl_remaining())
    }

    /// Number of held entries, expired ones included.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.lock().contains_key(key)
    }
}
