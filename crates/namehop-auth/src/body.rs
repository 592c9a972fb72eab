//! The canonical signing body for request envelopes.
//!
//! Every mutating request is authenticated over the deterministic CBOR
//! encoding of `{verb, data, time_bucket}`. The bucket is wall-clock time
//! truncated to one minute, so a signature is only valid near the time it
//! was produced.

use ciborium::value::Value;
use namehop_core::canonical_value_bytes;

use crate::error::{AuthError, Result};

/// Seconds per time bucket.
const BUCKET_SECONDS: u64 = 60;

/// Body field keys (integer keys for compact encoding).
mod keys {
    pub const VERB: u64 = 0;
    pub const DATA: u64 = 1;
    pub const BUCKET: u64 = 2;
}

/// A minute-granularity time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket(pub u64);

impl TimeBucket {
    /// The bucket containing the current wall-clock time.
    pub fn current() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_secs();
        Self(secs / BUCKET_SECONDS)
    }

    /// The immediately preceding bucket.
    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Hour of day (0-23) at the start of this bucket.
    ///
    /// Used by the legacy digest mode to pick its slice offset.
    pub fn hour_of_day(self) -> u64 {
        (self.0 / 60) % 24
    }
}

/// Encode the canonical signing body for `(verb, data)` at a bucket.
pub fn signing_body(verb: &str, data: &serde_json::Value, bucket: TimeBucket) -> Result<Vec<u8>> {
    let entries = vec![
        (
            Value::Integer(keys::VERB.into()),
            Value::Text(verb.to_string()),
        ),
        (Value::Integer(keys::DATA.into()), json_to_cbor(data)?),
        (
            Value::Integer(keys::BUCKET.into()),
            Value::Integer(bucket.0.into()),
        ),
    ];
    Ok(canonical_value_bytes(&Value::Map(entries)))
}

/// Convert a JSON payload to a CBOR value suitable for canonical encoding.
///
/// Floats are rejected: they have no canonical encoding here, and no verb
/// payload contains one.
fn json_to_cbor(value: &serde_json::Value) -> Result<Value> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Integer(u.into()))
            } else {
                Err(AuthError::UnsignableData(format!(
                    "non-integer number: {}",
                    n
                )))
            }
        }
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        serde_json::Value::Array(items) => {
            let converted = items.iter().map(json_to_cbor).collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(converted))
        }
        serde_json::Value::Object(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| Ok((Value::Text(k.clone()), json_to_cbor(v)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Map(entries))
        }
    }
}
