//! RecordStore trait: the abstract interface for record persistence.
//!
//! This trait keeps the registry storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use namehop_core::Record;

use crate::error::Result;

/// The RecordStore trait: async interface for record persistence.
///
/// The store is the single source of truth. Any cache layered above it is
/// an optimization and must never be consulted for completeness.
///
/// # Design Notes
///
/// - **Absence is not an error**: `get` returns `Ok(None)` for a missing
///   name; translating absence into a not-found failure is the registry's
///   job, not the store's.
/// - **Upsert puts**: `put` overwrites any existing record for the name.
/// - **Complete scans**: `keys` returns every stored name as of the call,
///   in no particular order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record stored under a name.
    async fn get(&self, name: &str) -> Result<Option<Record>>;

    /// Insert or replace the record stored under its name.
    async fn put(&self, record: &Record) -> Result<()>;

    /// Delete the record stored under a name. Deleting a missing name is
    /// not an error.
    async fn del(&self, name: &str) -> Result<()>;

    /// Enumerate all stored names. Unordered, complete at call time.
    async fn keys(&self) -> Result<Vec<String>>;
}
