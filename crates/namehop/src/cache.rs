//! Bounded record cache.
//!
//! Capacity- and age-bounded. Eviction is silent: an evicted entry simply
//! reads as a miss, and the registry falls through to the store. The cache
//! is never consulted for correctness-sensitive decisions — the store stays
//! the source of truth.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use namehop_core::Record;

/// Bounds for a [`BoundedCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held at once.
    pub max_entries: usize,
    /// Maximum age before an entry reads as a miss.
    pub max_age: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_age: Duration::from_secs(15 * 60),
        }
    }
}

struct Entry {
    record: Record,
    inserted_at: Instant,
}

/// Thread-safe bounded cache keyed by record name.
///
/// Operations are synchronous and atomic per call; the mutex is held only
/// for the duration of one map operation.
pub struct BoundedCache {
    entries: Mutex<HashMap<String, Entry>>,
    config: CacheConfig,
}

impl BoundedCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Look up a fresh entry. Expired entries are dropped on access.
    pub fn get(&self, name: &str) -> Option<Record> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(name) {
            Some(entry) if entry.inserted_at.elapsed() <= self.config.max_age => {
                Some(entry.record.clone())
            }
            Some(_) => {
                entries.remove(name);
                None
            }
            None => None,
        }
    }

    /// Whether a fresh entry exists.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace an entry, evicting the oldest when full.
    pub fn set(&self, record: Record) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let name = record.name().to_string();

        if !entries.contains_key(&name) && entries.len() >= self.config.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            name,
            Entry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove an entry. Removing a missing key is not an error.
    pub fn del(&self, name: &str) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(name);
    }

    /// Number of entries currently held (including not-yet-expired ones).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(name: &str) -> Record {
        Record::create_at(name, "https://a1.test.com", None, 1736870400000).unwrap()
    }

    fn cache(max_entries: usize, max_age: Duration) -> BoundedCache {
        BoundedCache::new(CacheConfig {
            max_entries,
            max_age,
        })
    }

    #[test]
    fn test_set_get_del() {
        let cache = cache(10, Duration::from_secs(60));
        cache.set(make_record("a"));

        assert!(cache.has("a"));
        assert_eq!(cache.get("a").unwrap().name(), "a");

        cache.del("a");
        assert!(!cache.has("a"));
        cache.del("a"); // not an error
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = cache(2, Duration::from_secs(60));
        cache.set(make_record("a"));
        cache.set(make_record("b"));
        cache.set(make_record("c"));

        assert_eq!(cache.len(), 2);
        // The oldest entry is gone; eviction is silent
        assert!(!cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("c"));
    }

    #[test]
    fn test_replacing_does_not_evict() {
        let cache = cache(2, Duration::from_secs(60));
        cache.set(make_record("a"));
        cache.set(make_record("b"));
        cache.set(make_record("a")); // replacement, cache already full

        assert_eq!(cache.len(), 2);
        assert!(cache.has("a"));
        assert!(cache.has("b"));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = cache(10, Duration::from_millis(0));
        cache.set(make_record("a"));
        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 0);
    }
}
