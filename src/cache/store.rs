//! Cache Store Module
//!
//! Single-threaded cache engine: HashMap storage with oldest-insertion-first
//! eviction, lazy TTL expiry, invalidation and near-expiry renewal. Shared
//! access goes through [`crate::cache::OperatorCache`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::cache::{eviction, CacheEntry, CacheStats, CacheValue, Cacheable};

// == Renewal Outcome ==
/// Result of a near-expiry renewal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renewal {
    /// No entry under the key, or it had already expired (and was removed)
    Absent,
    /// Entry is live and outside the renewal window
    Fresh,
    /// Entry was inside the renewal window and its expiry was pushed back
    Renewed,
}

// == Cache Store ==
/// Main cache storage with TTL support and bounded size.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when a write carries none
    default_ttl: Duration,
    /// Next write sequence number
    next_sequence: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries, clamped to at least one
    /// * `default_ttl` - TTL for writes without an explicit one
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl,
            next_sequence: 0,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry.
    ///
    /// When a new key arrives at capacity, the oldest 10% of entries (rounded
    /// up) are evicted first. A missing or zero `ttl` falls back to the
    /// default TTL.
    ///
    /// Returns the number of entries evicted.
    pub fn set(&mut self, key: String, value: CacheValue, ttl: Option<Duration>) -> usize {
        let ttl = match ttl {
            Some(ttl) if !ttl.is_zero() => ttl,
            _ => self.default_ttl,
        };

        let mut evicted = 0;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            evicted = self.evict(eviction::eviction_count(self.max_entries));
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.entries.insert(key, CacheEntry::new(value, ttl, sequence));
        self.stats.record_set();
        self.stats.set_size(self.entries.len());

        evicted
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<CacheValue> {
        self.get_as::<CacheValue>(key)
    }

    /// Retrieves a live value by key as `T`.
    ///
    /// An entry holding a different payload variant counts as a miss and is
    /// left in place.
    pub fn get_as<T: Cacheable>(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                match T::from_cache_value(entry.value.clone()) {
                    Some(value) => {
                        self.stats.record_hit();
                        Some(value)
                    }
                    None => {
                        warn!(
                            "Cache entry {} holds a {} payload, treating as miss",
                            key,
                            entry.value.kind()
                        );
                        self.stats.record_miss();
                        None
                    }
                }
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.set_size(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Looks up a live entry without touching statistics.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key. Idempotent.
    ///
    /// Returns true and counts an invalidation only if something was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.stats.record_invalidations(1);
            self.stats.set_size(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Invalidate Matching ==
    /// Removes every key matching `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        let removed = before - self.entries.len();

        self.stats.record_invalidations(removed);
        self.stats.set_size(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();

        self.stats.record_invalidations(removed);
        self.stats.set_size(0);
        removed
    }

    // == Renew ==
    /// Extends a live entry's expiry by `extension` when fewer than `window`
    /// remain. Expired entries are removed instead.
    ///
    /// Only the expiry changes; value and insertion time are kept. The new
    /// expiry is always later than the old one.
    pub fn renew(&mut self, key: &str, window: Duration, extension: Duration) -> Renewal {
        let now = Instant::now();
        let Some(entry) = self.entries.get_mut(key) else {
            return Renewal::Absent;
        };

        if entry.is_expired_at(now) {
            self.entries.remove(key);
            self.stats.set_size(self.entries.len());
            return Renewal::Absent;
        }

        if entry.expires_at.saturating_duration_since(now) < window {
            entry.expires_at += extension;
            debug!("Renewed near-expiry entry {}", key);
            Renewal::Renewed
        } else {
            Renewal::Fresh
        }
    }

    // == Expired Keys ==
    /// Returns keys whose entries have expired.
    pub fn expired_keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Removes `key` only if its current entry has expired.
    ///
    /// A key rewritten since it was found expired is kept.
    pub fn remove_if_expired(&mut self, key: &str) -> bool {
        let expired = self.entries.get(key).is_some_and(CacheEntry::is_expired);
        if expired {
            self.entries.remove(key);
            self.stats.set_size(self.entries.len());
        }
        expired
    }

    // == Watermarks ==
    pub fn mark_cleanup(&mut self, at: DateTime<Utc>) {
        self.stats.record_cleanup(at);
    }

    pub fn mark_preload(&mut self, at: DateTime<Utc>) {
        self.stats.record_preload(at);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is held, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Evict ==
    fn evict(&mut self, count: usize) -> usize {
        let victims = eviction::select_oldest(&self.entries, count);
        for key in &victims {
            self.entries.remove(key);
        }

        debug!("Evicted {} oldest entries", victims.len());
        self.stats.record_evictions(victims.len());
        victims.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys;
    use crate::models::{ActivityPage, ListingPage};
    use std::thread::sleep;

    const DEFAULT_TTL: Duration = Duration::from_secs(300);

    fn page(total: u64) -> CacheValue {
        CacheValue::Listing(ListingPage {
            items: Vec::new(),
            total,
        })
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100, DEFAULT_TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(CacheStore::new(0, DEFAULT_TTL).max_entries(), 1);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), None);

        assert_eq!(store.get("key1"), Some(page(1)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().sets, 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        assert!(store.get("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), None);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.stats().invalidations, 0);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), None);
        store.set("key1".to_string(), page(2), None);

        assert_eq!(store.get("key1"), Some(page(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), Some(Duration::from_millis(200)));
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(250));

        assert!(store.get("key1").is_none());
        assert!(!store.contains_key("key1"));
        assert!(store.get("key1").is_none());

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_store_zero_ttl_uses_default() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), Some(Duration::ZERO));

        let entry = store.peek("key1").unwrap();
        assert!(entry.ttl_remaining() > Duration::from_secs(299));
    }

    #[test]
    fn test_store_evicts_oldest_tenth() {
        let mut store = CacheStore::new(10, DEFAULT_TTL);

        for i in 0..10 {
            store.set(format!("key{}", i), page(i), None);
        }
        // Reads do not protect an entry from eviction
        assert!(store.get("key0").is_some());

        let evicted = store.set("key10".to_string(), page(10), None);

        assert_eq!(evicted, 1);
        assert_eq!(store.len(), 10);
        assert!(!store.contains_key("key0"));
        assert!(store.contains_key("key1"));
        assert!(store.contains_key("key10"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(3, DEFAULT_TTL);

        store.set("a".to_string(), page(1), None);
        store.set("b".to_string(), page(2), None);
        store.set("c".to_string(), page(3), None);

        assert_eq!(store.set("b".to_string(), page(4), None), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_store_rewrite_moves_key_to_young_end() {
        let mut store = CacheStore::new(3, DEFAULT_TTL);

        store.set("a".to_string(), page(1), None);
        store.set("b".to_string(), page(2), None);
        store.set("c".to_string(), page(3), None);
        store.set("a".to_string(), page(4), None);

        store.set("d".to_string(), page(5), None);

        assert!(store.contains_key("a"));
        assert!(!store.contains_key("b"));
    }

    #[test]
    fn test_store_invalidate_matching() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set(keys::operators_list_key(1, 20, None), page(1), None);
        store.set(keys::operators_list_key(2, 20, None), page(2), None);
        store.set(
            keys::operator_activities_key(7, 1, 20),
            CacheValue::Activities(ActivityPage::default()),
            None,
        );

        let pattern = Regex::new(keys::LIST_KEYS_PATTERN).unwrap();
        assert_eq!(store.invalidate_matching(&pattern), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().invalidations, 2);
        assert_eq!(store.invalidate_matching(&pattern), 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("a".to_string(), page(1), None);
        store.set("b".to_string(), page(2), None);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.stats().invalidations, 2);
    }

    #[test]
    fn test_store_renew_inside_window() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);
        store.set("operator:1".to_string(), page(1), Some(Duration::from_secs(60)));
        let before = store.peek("operator:1").unwrap().expires_at;

        let outcome = store.renew("operator:1", Duration::from_secs(300), DEFAULT_TTL);

        assert_eq!(outcome, Renewal::Renewed);
        assert_eq!(store.peek("operator:1").unwrap().expires_at, before + DEFAULT_TTL);
    }

    #[test]
    fn test_store_renew_outside_window() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);
        store.set("operator:1".to_string(), page(1), Some(Duration::from_secs(3600)));
        let before = store.peek("operator:1").unwrap().expires_at;

        let outcome = store.renew("operator:1", Duration::from_secs(300), DEFAULT_TTL);

        assert_eq!(outcome, Renewal::Fresh);
        assert_eq!(store.peek("operator:1").unwrap().expires_at, before);
    }

    #[test]
    fn test_store_renew_expired_reports_absent() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);
        store.set("operator:1".to_string(), page(1), Some(Duration::from_millis(50)));

        sleep(Duration::from_millis(80));

        assert_eq!(
            store.renew("operator:1", Duration::from_secs(300), DEFAULT_TTL),
            Renewal::Absent
        );
        assert!(!store.contains_key("operator:1"));
        assert_eq!(
            store.renew("operator:2", Duration::from_secs(300), DEFAULT_TTL),
            Renewal::Absent
        );
    }

    #[test]
    fn test_store_expired_keys() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), Some(Duration::from_millis(100)));
        store.set("key2".to_string(), page(2), Some(Duration::from_secs(10)));

        sleep(Duration::from_millis(150));

        assert_eq!(store.expired_keys(), vec!["key1".to_string()]);
        assert!(store.remove_if_expired("key1"));
        assert!(!store.remove_if_expired("key2"));
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_store_remove_if_expired_keeps_rewritten_key() {
        let mut store = CacheStore::new(100, DEFAULT_TTL);

        store.set("key1".to_string(), page(1), Some(Duration::from_millis(50)));
        sleep(Duration::from_millis(80));
        let expired = store.expired_keys();

        store.set("key1".to_string(), page(2), None);

        assert_eq!(expired.len(), 1);
        assert!(!store.remove_if_expired(&expired[0]));
        assert_eq!(store.get("key1"), Some(page(2)));
    }
}
