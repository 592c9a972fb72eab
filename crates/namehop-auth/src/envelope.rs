//! The wire envelope carried by every API request.

use serde::{Deserialize, Serialize};

/// A mutating request envelope: `{verb, data, signature}`.
///
/// Transient: constructed per call, never persisted. The signature covers
/// the canonical body of `{verb, data, time_bucket}` — see [`crate::body`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Operation name. An empty verb is a ping, answered with the service
    /// banner.
    #[serde(default)]
    pub verb: String,

    /// Verb-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,

    /// Hex signature over the canonical body. Absent on unauthenticated
    /// calls, which are rejected before any business logic runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Envelope {
    /// Construct a signed envelope.
    pub fn new(verb: impl Into<String>, data: serde_json::Value, signature: String) -> Self {
        Self {
            verb: verb.into(),
            data,
            signature: Some(signature),
        }
    }
}
