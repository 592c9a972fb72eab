//! # namehop store
//!
//! Storage abstraction and backends for namehop records.
//!
//! The [`RecordStore`] trait is the registry's only view of durable state.
//! Two implementations are provided:
//!
//! - [`SqliteStore`] - the primary backend (rusqlite, versioned migrations)
//! - [`MemoryStore`] - same semantics, no persistence; for tests

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::RecordStore;
