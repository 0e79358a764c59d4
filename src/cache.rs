//! Small time-to-live cache keyed by lookup identifier.
//!
//! Entries expire a fixed duration after insertion. Expired entries are not
//! returned by [`TtlCache::get`] but are retained until overwritten or
//! purged so callers can fall back to the last known value when a refetch
//! fails ([`TtlCache::get_stale`]).

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Entry in the cache.
#[derive(Debug, Clone)]
struct Entry<V> {
    /// Cached value.
    value: V,
    /// Insertion time.
    inserted_at: Instant,
}

impl<V> Entry<V> {
    /// Whether this entry is older than `ttl` at `now`.
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.inserted_at) > ttl
    }
}

/// Thread-safe map with per-entry time-to-live expiry.
///
/// Shared across all flights by the telemetry adapter; a fresh hit avoids a
/// network call, expiry forces a refetch.
pub struct TtlCache<K, V> {
    /// Cache storage.
    entries: Mutex<HashMap<K, Entry<V>>>,
    /// Validity window for every entry.
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// Create a cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Get a fresh value, or `None` if absent or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;
        if entry.is_expired(Instant::now(), self.ttl) {
            None
        } else {
            Some(entry.value.clone())
        }
    }

    /// Get a value regardless of age.
    ///
    /// Last-known-good path: used when a refetch fails and a stale value is
    /// better than none.
    pub fn get_stale(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).map(|e| e.value.clone())
    }

    /// Insert or replace a value, resetting its age.
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop all expired entries.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, e| !e.is_expired(now, self.ttl));
    }

    /// Number of entries currently stored (fresh and stale).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_fresh_entry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(10));
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
    }

    #[test]
    fn test_get_missing_entry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(10));
        assert_eq!(cache.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_expired_entry_not_returned() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO);
        cache.insert("a".to_string(), 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn test_stale_entry_retained_for_fallback() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO);
        cache.insert("a".to_string(), 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get_stale(&"a".to_string()), Some(1));
    }

    #[test]
    fn test_insert_resets_age() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(10));
        cache.insert("a".to_string(), 1);
        cache.insert("a".to_string(), 2);
        assert_eq!(cache.get(&"a".to_string()), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_expired_drops_old_entries() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO);
        cache.insert("a".to_string(), 1);
        std::thread::sleep(Duration::from_millis(5));
        cache.purge_expired();
        assert!(cache.is_empty());
        assert_eq!(cache.get_stale(&"a".to_string()), None);
    }

    #[test]
    fn test_clear() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(10));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
