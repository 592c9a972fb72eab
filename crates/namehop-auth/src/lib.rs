//! # namehop auth
//!
//! Request-level envelope authentication for namehop.
//!
//! Every mutating API call carries an [`Envelope`] whose signature is
//! checked before any business logic runs. The signature covers the
//! deterministic CBOR encoding of `{verb, data, time_bucket}`; buckets are
//! one minute wide and the immediately preceding bucket is accepted as a
//! grace window.
//!
//! Two modes exist:
//!
//! - [`AuthMode::Ed25519`] (preferred): asymmetric signature against a
//!   configured public key.
//! - [`AuthMode::LegacyDigest`] (low assurance): a digest slice keyed only
//!   by hour-of-day. No secret is involved; it refuses destructive verbs.
//!
//! Request-level signing is independent from per-record ownership codes:
//! passing one check never implies passing the other.

pub mod authenticator;
pub mod body;
pub mod envelope;
pub mod error;
pub mod keyfile;

pub use authenticator::{AuthConfig, AuthMode, Authenticator};
pub use body::{signing_body, TimeBucket};
pub use envelope::Envelope;
pub use error::{AuthError, Result};
pub use keyfile::{load_signing_key, load_verifying_key};
