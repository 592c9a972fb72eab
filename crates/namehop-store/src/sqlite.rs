//! SQLite implementation of the RecordStore trait.
//!
//! This is the primary storage backend for namehop. It uses rusqlite with
//! bundled SQLite behind an internal mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use namehop_core::{OwnershipProof, Record};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::RecordStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Record operations are short single-row
/// statements; the mutex is held only for the duration of one statement.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path.as_ref())?;
        migration::migrate(&mut conn)?;
        debug!(path = %path.as_ref().display(), "opened record store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }
}

/// Convert a row to a Record.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let name: String = row.get("name")?;
    let href: String = row.get("href")?;
    let time: i64 = row.get("time")?;
    let proof_bytes: Option<Vec<u8>> = row.get("proof")?;

    let proof = match proof_bytes {
        Some(bytes) => {
            let arr: [u8; 32] = bytes.try_into().map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    3,
                    "proof".into(),
                    rusqlite::types::Type::Blob,
                )
            })?;
            Some(OwnershipProof::from_bytes(arr))
        }
        None => None,
    };

    Ok(Record::from_parts(name, href, time, proof))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, name: &str) -> Result<Option<Record>> {
        self.with_conn(|conn| {
            let record = conn
                .query_row(
                    "SELECT name, href, time, proof FROM records WHERE name = ?1",
                    params![name],
                    row_to_record,
                )
                .optional()?;
            Ok(record)
        })
    }

    async fn put(&self, record: &Record) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO records (name, href, time, proof) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name) DO UPDATE SET href = ?2, time = ?3, proof = ?4",
                params![
                    record.name(),
                    record.href(),
                    record.time(),
                    record.proof().map(|p| p.as_bytes().to_vec()),
                ],
            )?;
            Ok(())
        })
    }

    async fn del(&self, name: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM records WHERE name = ?1", params![name])?;
            Ok(())
        })
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM records")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(names)
        })
    }
}
