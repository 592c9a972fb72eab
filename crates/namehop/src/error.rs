//! Error types for the registry engine.

use namehop_core::ValidationError;
use namehop_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// These are the business-semantic failures the dispatcher folds into the
/// uniform `{state:false, error}` envelope; their display strings are part
/// of the wire contract.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Field validation failed (missing name/href, malformed href,
    /// forbidden host).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The supplied ownership code does not reproduce the stored proof.
    #[error("code not matched")]
    CodeNotMatched,

    /// No record is bound under the name.
    #[error("name not found")]
    NotFound,

    /// The wire verb is not one of the supported operations.
    #[error("not implemented")]
    UnsupportedVerb(String),

    /// Storage failure. Never surfaced through the response envelope as-is.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
