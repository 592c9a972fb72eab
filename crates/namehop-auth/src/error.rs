//! Error types for request-level authentication.

use thiserror::Error;

/// Errors that can occur while verifying or producing envelope signatures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No signature was supplied with a mutating request.
    #[error("missing signature")]
    SignatureMissing,

    /// The signature did not verify for any accepted time bucket.
    #[error("invalid signature")]
    SignatureInvalid,

    /// Legacy digest mode refuses to gate destructive operations.
    #[error("legacy mode refuses destructive operations")]
    LegacyModeRefused,

    /// Signing requested but no signing key was configured.
    #[error("signing key not configured")]
    SigningKeyMissing,

    /// Envelope data cannot be canonically encoded (e.g. floats).
    #[error("unsignable envelope data: {0}")]
    UnsignableData(String),

    /// Key file could not be parsed.
    #[error("invalid key file: {0}")]
    KeyFile(String),

    /// I/O error while loading key material.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
