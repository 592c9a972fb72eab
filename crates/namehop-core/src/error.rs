//! Error types for namehop core.

use thiserror::Error;

/// Errors from cryptographic primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Validation errors for record fields.
///
/// The display strings are part of the wire contract: they appear verbatim
/// in the `error` field of API failure responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("href required")]
    HrefRequired,

    #[error("invalid scheme")]
    InvalidScheme,

    #[error("invalid localhost")]
    InvalidLocalhost,
}
