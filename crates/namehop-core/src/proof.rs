//! Ownership proofs: the record-level binding primitive.
//!
//! A proof is `Blake3(canonical_public_bytes || SEP || code)`. It binds an
//! ownership code to the exact public content of a record. This is a
//! content-binding digest, not a MAC: no secret key material is involved,
//! so its strength rests on code secrecy and pre-image resistance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::public_record_bytes;
use crate::crypto::Digest;
use crate::record::PublicRecord;

/// Domain separator between the record bytes and the code.
///
/// Prevents a code from being absorbed into a crafted href suffix.
const PROOF_SEPARATOR: &[u8] = &[0x1f];

/// A 32-byte ownership proof stored in place of the code itself.
///
/// Persisted with the record but never serialized into any external view.
/// `Debug` is redacted so the proof cannot leak through logs.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipProof(Digest);

impl OwnershipProof {
    /// Bind a code to a record's public content.
    pub fn bind(public: &PublicRecord, code: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&public_record_bytes(public));
        hasher.update(PROOF_SEPARATOR);
        hasher.update(code.as_bytes());
        Self(Digest(*hasher.finalize().as_bytes()))
    }

    /// Check whether a code reproduces this proof for the given public
    /// content. Comparison is constant-time.
    pub fn matches(&self, public: &PublicRecord, code: &str) -> bool {
        let recomputed = Self::bind(public, code);
        self.0.ct_eq(&recomputed.0)
    }

    /// Get the raw bytes (store persistence only).
    pub const fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Create from raw bytes (store persistence only).
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Digest(bytes))
    }
}

impl fmt::Debug for OwnershipProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnershipProof(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public() -> PublicRecord {
        PublicRecord {
            name: "b".to_string(),
            href: "https://b1.test.com".to_string(),
            time: 1736870400000,
        }
    }

    #[test]
    fn test_bind_deterministic() {
        let p1 = OwnershipProof::bind(&public(), "123");
        let p2 = OwnershipProof::bind(&public(), "123");
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_matches_right_code() {
        let proof = OwnershipProof::bind(&public(), "123");
        assert!(proof.matches(&public(), "123"));
    }

    #[test]
    fn test_rejects_wrong_code() {
        let proof = OwnershipProof::bind(&public(), "123");
        assert!(!proof.matches(&public(), "456"));
        assert!(!proof.matches(&public(), ""));
    }

    #[test]
    fn test_bound_to_content() {
        let proof = OwnershipProof::bind(&public(), "123");
        let mut other = public();
        other.href = "https://b2.test.com".to_string();
        assert!(!proof.matches(&other, "123"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let proof = OwnershipProof::bind(&public(), "123");
        assert_eq!(format!("{:?}", proof), "OwnershipProof(..)");
    }
}
