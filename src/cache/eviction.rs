//! Eviction Policy Module
//!
//! Oldest-insertion-first victim selection. Reads never change an entry's
//! position; only a fresh `set` moves a key to the young end.

use std::collections::HashMap;

use crate::cache::CacheEntry;

/// Fraction of capacity dropped when the store is full, rounded up.
const EVICTION_FRACTION_PERCENT: usize = 10;

// == Eviction Count ==
/// Number of entries to drop when a store of `max_entries` is full.
///
/// `ceil(max_entries * 0.1)`, never less than one.
pub fn eviction_count(max_entries: usize) -> usize {
    let count = (max_entries * EVICTION_FRACTION_PERCENT).div_ceil(100);
    count.max(1)
}

// == Select Oldest ==
/// Returns up to `count` keys with the smallest insertion time, oldest first.
///
/// When `count` exceeds the number of entries, every key is returned.
pub fn select_oldest(entries: &HashMap<String, CacheEntry>, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<(&String, &CacheEntry)> = entries.iter().collect();
    candidates.sort_unstable_by_key(|(_, entry)| entry.insertion_order());

    candidates
        .into_iter()
        .take(count)
        .map(|(key, _)| key.clone())
        .collect()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheValue;
    use crate::models::ActivityPage;
    use std::time::Duration;

    fn entries(keys: &[&str]) -> HashMap<String, CacheEntry> {
        keys.iter()
            .enumerate()
            .map(|(seq, key)| {
                let value = CacheValue::Activities(ActivityPage::default());
                (
                    key.to_string(),
                    CacheEntry::new(value, Duration::from_secs(60), seq as u64),
                )
            })
            .collect()
    }

    #[test]
    fn test_eviction_count_rounds_up() {
        assert_eq!(eviction_count(5000), 500);
        assert_eq!(eviction_count(10), 1);
        assert_eq!(eviction_count(11), 2);
        assert_eq!(eviction_count(3), 1);
        assert_eq!(eviction_count(1), 1);
    }

    #[test]
    fn test_select_oldest_in_insertion_order() {
        let map = entries(&["a", "b", "c", "d"]);
        assert_eq!(select_oldest(&map, 2), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_select_more_than_available() {
        let map = entries(&["a", "b"]);
        assert_eq!(select_oldest(&map, 10).len(), 2);
    }

    #[test]
    fn test_select_none() {
        let map = entries(&["a"]);
        assert!(select_oldest(&map, 0).is_empty());
        assert!(select_oldest(&HashMap::new(), 3).is_empty());
    }
}
