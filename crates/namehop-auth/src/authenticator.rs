//! The request authenticator: envelope signature verification and signing.
//!
//! This layer is independent from per-record ownership codes. A caller can
//! hold a perfectly valid ownership code and still be rejected here, and a
//! correctly signed envelope does not bypass an ownership check.

use tracing::warn;

use namehop_core::{Ed25519Signature, Keypair};

use crate::body::{signing_body, TimeBucket};
use crate::error::{AuthError, Result};

/// Number of hex characters in a legacy digest slice.
const LEGACY_SLICE_LEN: usize = 18;

/// How envelope signatures are produced and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Ed25519 signature over the canonical body (preferred).
    Ed25519,
    /// Deterministic digest slice keyed only by hour-of-day. Obscurity,
    /// not secrecy: anyone who knows the scheme can forge it. Refuses to
    /// gate destructive operations.
    LegacyDigest,
}

/// Immutable key material and mode for an [`Authenticator`].
///
/// Constructed once at process start and passed in explicitly; there is no
/// ambient key state.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The key envelopes are verified against.
    pub verifying_key: namehop_core::Ed25519PublicKey,
    /// The paired signing key, present only on the operator side.
    pub signing_key: Option<Keypair>,
    /// Verification strategy.
    pub mode: AuthMode,
}

impl AuthConfig {
    /// Ed25519 verification with the given public key.
    pub fn new(verifying_key: namehop_core::Ed25519PublicKey) -> Self {
        Self {
            verifying_key,
            signing_key: None,
            mode: AuthMode::Ed25519,
        }
    }

    /// Attach the paired signing key.
    pub fn with_signing_key(mut self, keypair: Keypair) -> Self {
        self.signing_key = Some(keypair);
        self
    }

    /// Select a verification mode.
    pub fn with_mode(mut self, mode: AuthMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Verifies and produces signatures on request envelopes.
///
/// Signatures are valid for the current minute bucket and the immediately
/// preceding one, absorbing clock and latency skew across the boundary.
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        if config.mode == AuthMode::LegacyDigest {
            warn!("legacy digest auth mode is low-assurance; destructive verbs are refused");
        }
        Self { config }
    }

    /// Verify the signature on an inbound envelope.
    pub fn verify(&self, verb: &str, data: &serde_json::Value, signature: Option<&str>) -> Result<()> {
        self.verify_with_now(verb, data, signature, TimeBucket::current())
    }

    /// Verify against an explicit "now" bucket.
    ///
    /// Accepts `now` and `now - 1`.
    pub fn verify_with_now(
        &self,
        verb: &str,
        data: &serde_json::Value,
        signature: Option<&str>,
        now: TimeBucket,
    ) -> Result<()> {
        let signature = match signature {
            Some(s) if !s.is_empty() => s,
            _ => return Err(AuthError::SignatureMissing),
        };

        if self.config.mode == AuthMode::LegacyDigest && verb == "kill" {
            return Err(AuthError::LegacyModeRefused);
        }

        for bucket in [now, now.prev()] {
            if self.verify_at(verb, data, signature, bucket)? {
                return Ok(());
            }
        }
        Err(AuthError::SignatureInvalid)
    }

    /// Check one bucket. Returns `Ok(false)` on a clean mismatch so the
    /// caller can try the grace bucket.
    fn verify_at(
        &self,
        verb: &str,
        data: &serde_json::Value,
        signature: &str,
        bucket: TimeBucket,
    ) -> Result<bool> {
        match self.config.mode {
            AuthMode::Ed25519 => {
                let sig = match Ed25519Signature::from_hex(signature) {
                    Ok(sig) => sig,
                    Err(_) => return Ok(false),
                };
                let body = signing_body(verb, data, bucket)?;
                Ok(self.config.verifying_key.verify(&body, &sig).is_ok())
            }
            AuthMode::LegacyDigest => {
                let expected = legacy_digest(verb, data, bucket)?;
                Ok(expected == signature)
            }
        }
    }

    /// Produce a signature for an outbound envelope (operator side).
    pub fn sign(&self, verb: &str, data: &serde_json::Value) -> Result<String> {
        self.sign_at(verb, data, TimeBucket::current())
    }

    /// Sign for an explicit bucket.
    pub fn sign_at(&self, verb: &str, data: &serde_json::Value, bucket: TimeBucket) -> Result<String> {
        match self.config.mode {
            AuthMode::Ed25519 => {
                let keypair = self
                    .config
                    .signing_key
                    .as_ref()
                    .ok_or(AuthError::SigningKeyMissing)?;
                let body = signing_body(verb, data, bucket)?;
                Ok(keypair.sign(&body).to_hex())
            }
            AuthMode::LegacyDigest => legacy_digest(verb, data, bucket),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.config.mode
    }
}

/// The legacy digest slice: hex Blake3 of the canonical body, sliced at an
/// offset derived from the bucket's hour of day.
fn legacy_digest(verb: &str, data: &serde_json::Value, bucket: TimeBucket) -> Result<String> {
    let body = signing_body(verb, data, bucket)?;
    let hex = blake3::hash(&body).to_hex().to_string();
    let offset = (bucket.hour_of_day() as usize) * 2;
    Ok(hex[offset..offset + LEGACY_SLICE_LEN].to_string())
}
