//! In-memory implementation of the RecordStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use namehop_core::Record;

use crate::error::Result;
use crate::traits::RecordStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<Record>> {
        let records = self.records.read().unwrap();
        Ok(records.get(name).cloned())
    }

    async fn put(&self, record: &Record) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(record.name().to_string(), record.clone());
        Ok(())
    }

    async fn del(&self, name: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.remove(name);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let records = self.records.read().unwrap();
        Ok(records.keys().cloned().collect())
    }
}
