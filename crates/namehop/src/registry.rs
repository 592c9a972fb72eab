//! The registry: bind, find, kill, list.
//!
//! All mutations of a given name are serialized through a per-name lock, so
//! two concurrent binds of the same name cannot interleave their
//! read-verify-write sequences. Reads take no lock.

use std::collections::HashMap;
use std::sync::Arc;

use namehop_core::{validate_href, validate_name, PublicRecord, Record};
use namehop_store::RecordStore;
use tracing::{debug, info, warn};

use crate::backing::Backing;
use crate::cache::CacheConfig;
use crate::error::{RegistryError, Result};

/// Registry tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub cache: CacheConfig,
}

/// A registry operation, as decoded off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Bind {
        name: String,
        href: String,
        code: Option<String>,
    },
    Kill {
        name: String,
        code: Option<String>,
    },
    Find {
        name: String,
    },
    List,
}

/// The successful result of a registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A record view, from `find`.
    Record(PublicRecord),
    /// All bound names, from `list`.
    Names(Vec<String>),
    /// The operation completed; nothing to return. `bind` and `kill`
    /// acknowledge without echoing the record.
    Done,
}

/// The name→href registry over a cached durable store.
pub struct Registry<S: RecordStore> {
    backing: Backing<S>,
    locks: std::sync::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: RecordStore> Registry<S> {
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self {
            backing: Backing::new(store, config.cache),
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch a decoded request to the matching operation.
    pub async fn dispatch(&self, request: Request) -> Result<Response> {
        match request {
            Request::Bind { name, href, code } => {
                self.bind(&name, &href, code.as_deref()).await?;
                Ok(Response::Done)
            }
            Request::Kill { name, code } => {
                self.kill(&name, code.as_deref()).await?;
                Ok(Response::Done)
            }
            Request::Find { name } => Ok(Response::Record(self.find(&name).await?)),
            Request::List => Ok(Response::Names(self.list().await?)),
        }
    }

    /// Bind `name` to `href`, creating or updating the record.
    ///
    /// Binding an existing record to its current href is a no-op and always
    /// succeeds, regardless of code. Changing the href of a claimed record
    /// requires the matching code.
    pub async fn bind(&self, name: &str, href: &str, code: Option<&str>) -> Result<PublicRecord> {
        validate_name(name)?;
        validate_href(href)?;

        let lock = self.name_lock(name);
        let result = {
            let _guard = lock.lock().await;
            self.bind_under_lock(name, href, code).await
        };
        drop(lock);
        self.prune_name_lock(name);
        result
    }

    async fn bind_under_lock(
        &self,
        name: &str,
        href: &str,
        code: Option<&str>,
    ) -> Result<PublicRecord> {
        match self.backing.lookup(name).await? {
            None => {
                let record = Record::create(name, href, code)?;
                self.backing.commit(&record).await?;
                info!(name, href, claimed = record.is_claimed(), "bound new record");
                Ok(record.public())
            }
            Some(record) if record.href() == href => {
                debug!(name, "bind is a no-op, href unchanged");
                Ok(record.public())
            }
            Some(mut record) => {
                if !record.verify_ownership(code) {
                    warn!(name, "bind refused, code not matched");
                    return Err(RegistryError::CodeNotMatched);
                }
                record.apply_mutation(href, code);
                self.backing.commit(&record).await?;
                info!(name, href, claimed = record.is_claimed(), "rebound record");
                Ok(record.public())
            }
        }
    }

    /// Delete the record bound under `name`.
    pub async fn kill(&self, name: &str, code: Option<&str>) -> Result<()> {
        validate_name(name)?;

        let lock = self.name_lock(name);
        let result = {
            let _guard = lock.lock().await;
            self.kill_under_lock(name, code).await
        };
        drop(lock);
        self.prune_name_lock(name);
        result
    }

    async fn kill_under_lock(&self, name: &str, code: Option<&str>) -> Result<()> {
        let record = self
            .backing
            .lookup(name)
            .await?
            .ok_or(RegistryError::NotFound)?;
        if !record.verify_ownership(code) {
            warn!(name, "kill refused, code not matched");
            return Err(RegistryError::CodeNotMatched);
        }
        self.backing.remove(name).await?;
        info!(name, "killed record");
        Ok(())
    }

    /// Resolve `name` to its public record view.
    ///
    /// Cache hits are lock-free. A miss takes the name's lock before the
    /// store read so the cache refill cannot re-install a record that a
    /// concurrent `bind` or `kill` has just replaced or removed. A store
    /// read failure reads the same as absence; raw storage errors never
    /// surface through `find`.
    pub async fn find(&self, name: &str) -> Result<PublicRecord> {
        validate_name(name)?;
        if let Some(record) = self.backing.cached(name) {
            return Ok(record.public());
        }

        let lock = self.name_lock(name);
        let looked = {
            let _guard = lock.lock().await;
            self.backing.lookup(name).await
        };
        drop(lock);
        self.prune_name_lock(name);

        match looked {
            Ok(Some(record)) => Ok(record.public()),
            Ok(None) => Err(RegistryError::NotFound),
            Err(e) => {
                warn!(name, %e, "store read failed, reporting not found");
                Err(RegistryError::NotFound)
            }
        }
    }

    /// All currently bound names, in no particular order.
    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self.backing.names().await?)
    }

    fn name_lock(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop a name's lock entry once no caller holds it, so the table does
    /// not grow with every name ever touched. Callers must release their
    /// clone first.
    fn prune_name_lock(&self, name: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks.get(name).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(name);
        }
    }

    #[cfg(test)]
    fn lock_table_len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}
