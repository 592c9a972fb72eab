//! Read-through/write-through wrapper over the store and cache.
//!
//! Only the registry touches this type. The write order is fixed: the
//! store commit completes before the cache is updated, so a crash mid-write
//! can leave the cache stale but never ahead of the store.

use std::sync::Arc;

use namehop_core::Record;
use namehop_store::{RecordStore, Result};
use tracing::debug;

use crate::cache::{BoundedCache, CacheConfig};

pub struct Backing<S: RecordStore> {
    store: Arc<S>,
    cache: BoundedCache,
}

impl<S: RecordStore> Backing<S> {
    pub fn new(store: S, cache_config: CacheConfig) -> Self {
        Self {
            store: Arc::new(store),
            cache: BoundedCache::new(cache_config),
        }
    }

    /// Probe the cache only. Never touches the store.
    pub fn cached(&self, name: &str) -> Option<Record> {
        self.cache.get(name)
    }

    /// Resolve a record: cache hit, else store read populating the cache.
    ///
    /// Callers must hold the name's lock. Populating the cache while a
    /// mutation of the same name is in flight could re-install a record the
    /// mutation has already replaced or removed.
    pub async fn lookup(&self, name: &str) -> Result<Option<Record>> {
        if let Some(record) = self.cache.get(name) {
            return Ok(Some(record));
        }

        match self.store.get(name).await? {
            Some(record) => {
                self.cache.set(record.clone());
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Persist a record: store first, then cache.
    pub async fn commit(&self, record: &Record) -> Result<()> {
        self.store.put(record).await?;
        self.cache.set(record.clone());
        debug!(name = record.name(), href = record.href(), "committed record");
        Ok(())
    }

    /// Delete a record: store first, then cache.
    pub async fn remove(&self, name: &str) -> Result<()> {
        self.store.del(name).await?;
        self.cache.del(name);
        debug!(name, "removed record");
        Ok(())
    }

    /// Enumerate all names. Always a full store scan; the cache is bounded
    /// and may omit entries.
    pub async fn names(&self) -> Result<Vec<String>> {
        self.store.keys().await
    }

    #[cfg(test)]
    pub fn cache(&self) -> &BoundedCache {
        &self.cache
    }
}
