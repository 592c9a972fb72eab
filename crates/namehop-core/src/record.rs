//! Record: one name→href binding and its ownership metadata.
//!
//! A record is created on first successful bind, mutated in place by later
//! binds, and destroyed by kill. Ownership is established on first bind and
//! stays with the name until it is explicitly killed.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::href::{validate_href, validate_name};
use crate::proof::OwnershipProof;

/// The externally visible view of a record: `{name, href, time}`.
///
/// This is the only serializable form that crosses the API boundary. The
/// ownership proof lives on [`Record`] and has no representation here, so
/// no code path can leak it through a response or a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRecord {
    pub name: String,
    pub href: String,
    pub time: i64,
}

/// A stored name→href binding.
///
/// Deliberately does not implement `Serialize`: persistence backends store
/// fields individually, and external views go through [`PublicRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: String,
    href: String,
    time: i64,
    proof: Option<OwnershipProof>,
}

impl Record {
    /// Create a record for a first bind, stamped with the current time.
    ///
    /// A non-empty code claims the record: the ownership proof is bound to
    /// the public fields as they stand at creation.
    pub fn create(name: &str, href: &str, code: Option<&str>) -> Result<Self, ValidationError> {
        Self::create_at(name, href, code, now_millis())
    }

    /// Create a record with an explicit timestamp.
    pub fn create_at(
        name: &str,
        href: &str,
        code: Option<&str>,
        time: i64,
    ) -> Result<Self, ValidationError> {
        validate_name(name)?;
        validate_href(href)?;

        let mut record = Self {
            name: name.to_string(),
            href: href.to_string(),
            time,
            proof: None,
        };
        if let Some(code) = nonempty(code) {
            record.proof = Some(OwnershipProof::bind(&record.public(), code));
        }
        Ok(record)
    }

    /// Rehydrate a record from persisted fields. Store backends only.
    pub fn from_parts(
        name: String,
        href: String,
        time: i64,
        proof: Option<OwnershipProof>,
    ) -> Self {
        Self {
            name,
            href,
            time,
            proof,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    /// Whether an ownership proof is stored.
    pub fn is_claimed(&self) -> bool {
        self.proof.is_some()
    }

    /// Ownership proof for persistence. Store backends only.
    pub fn proof(&self) -> Option<&OwnershipProof> {
        self.proof.as_ref()
    }

    /// Check a caller's code against the stored proof.
    ///
    /// An unclaimed record accepts any code, including none. A claimed
    /// record accepts only a code that reproduces the stored proof
    /// (constant-time comparison).
    pub fn verify_ownership(&self, code: Option<&str>) -> bool {
        match &self.proof {
            None => true,
            Some(proof) => match nonempty(code) {
                Some(code) => proof.matches(&self.public(), code),
                None => false,
            },
        }
    }

    /// Apply a verified mutation: set the href and refresh the timestamp.
    ///
    /// The timestamp never moves backwards. A new proof is bound over the
    /// updated public fields only when a code is supplied; a mutation
    /// without a code leaves the record unclaimed.
    pub fn apply_mutation(&mut self, href: &str, code: Option<&str>) {
        self.apply_mutation_at(href, code, now_millis());
    }

    /// Apply a mutation with an explicit timestamp.
    pub fn apply_mutation_at(&mut self, href: &str, code: Option<&str>, now: i64) {
        self.href = href.to_string();
        self.time = self.time.max(now);
        self.proof = nonempty(code).map(|code| OwnershipProof::bind(&self.public(), code));
    }

    /// The `{name, href, time}` view.
    pub fn public(&self) -> PublicRecord {
        PublicRecord {
            name: self.name.clone(),
            href: self.href.clone(),
            time: self.time,
        }
    }
}

fn nonempty(code: Option<&str>) -> Option<&str> {
    code.filter(|c| !c.is_empty())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
