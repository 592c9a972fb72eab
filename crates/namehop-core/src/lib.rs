//! # namehop core
//!
//! Pure primitives for the namehop registry: records, ownership proofs,
//! and canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over record data.
//!
//! ## Key Types
//!
//! - [`Record`] - A stored name→href binding with ownership metadata
//! - [`PublicRecord`] - The `{name, href, time}` view that crosses the API
//!   boundary; the ownership proof has no representation here
//! - [`OwnershipProof`] - Content-binding digest stored in place of a code
//!
//! ## Canonicalization
//!
//! Proofs and request signatures are computed over deterministic CBOR.
//! See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod href;
pub mod proof;
pub mod record;

pub use canonical::{canonical_value_bytes, public_record_bytes};
pub use crypto::{Digest, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, ValidationError};
pub use href::{validate_href, validate_name};
pub use proof::OwnershipProof;
pub use record::{PublicRecord, Record};
