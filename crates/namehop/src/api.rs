//! Wire-facing dispatch: envelopes in, `{state, model?, error?}` out.
//!
//! Two entry points exist. [`Dispatcher::handle_api`] serves the signed
//! control surface; business failures come back as a 200-level
//! `{state:false, error}` body while authentication failures are rejected
//! outright with a status code. [`Dispatcher::handle_jump`] serves the
//! public unauthenticated redirect path.

use namehop_auth::{AuthError, Authenticator, Envelope};
use namehop_core::PublicRecord;
use namehop_store::RecordStore;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::RegistryError;
use crate::registry::{Registry, Request, Response};

/// Supported wire verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Bind,
    Find,
    Kill,
    List,
}

impl Verb {
    /// Parse a wire verb. Unknown verbs are a business failure, not a
    /// transport rejection.
    pub fn parse(verb: &str) -> Result<Self, RegistryError> {
        match verb {
            "bind" => Ok(Verb::Bind),
            "find" => Ok(Verb::Find),
            "kill" => Ok(Verb::Kill),
            "list" => Ok(Verb::List),
            other => Err(RegistryError::UnsupportedVerb(other.to_string())),
        }
    }
}

/// `data` payload for `bind`. Missing fields decode as empty strings and
/// fail validation downstream, so the wire error names the field.
#[derive(Debug, Deserialize)]
struct BindPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    href: String,
    #[serde(default)]
    code: Option<String>,
}

/// `data` payload for `kill`.
#[derive(Debug, Deserialize)]
struct KillPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: Option<String>,
}

/// `data` payload for `find`.
#[derive(Debug, Deserialize)]
struct FindPayload {
    #[serde(default)]
    name: String,
}

/// The uniform response body: `{state, model?, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiResponse {
    pub state: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    fn ok(model: Option<Value>) -> Self {
        Self {
            state: true,
            model,
            error: None,
        }
    }

    fn fail(error: String) -> Self {
        Self {
            state: false,
            model: None,
            error: Some(error),
        }
    }
}

/// Outcome of a control-surface call, for the transport to map onto HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    /// A response body to return with status 200, whether `state` is true
    /// or false.
    Response(ApiResponse),
    /// The empty-verb service banner, plain text.
    Banner(String),
    /// Reject the request outright with this status and no body.
    Rejected(u16),
}

/// Outcome of a public redirect lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Issue a 302 to this location.
    Redirect(String),
    /// No binding; 404.
    NotFound,
    /// Storage failed; 500. Details stay in the log.
    ServerError,
}

/// Dispatcher tuning.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Name announced by the empty-verb banner.
    pub service_name: String,
    /// Whether trailing path segments and the query string are carried
    /// over onto the redirect target.
    pub rewrite_path: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            service_name: "namehop".to_string(),
            rewrite_path: true,
        }
    }
}

/// Routes authenticated envelopes and public jumps into the registry.
pub struct Dispatcher<S: RecordStore> {
    registry: Registry<S>,
    auth: Authenticator,
    config: DispatchConfig,
}

impl<S: RecordStore> Dispatcher<S> {
    pub fn new(registry: Registry<S>, auth: Authenticator, config: DispatchConfig) -> Self {
        Self {
            registry,
            auth,
            config,
        }
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Handle a control-surface envelope.
    ///
    /// The signature is checked before anything else, including verb
    /// parsing. Only after authentication does the empty verb turn into
    /// the service banner.
    pub async fn handle_api(&self, envelope: &Envelope) -> ApiOutcome {
        if let Err(e) = self.auth.verify(
            &envelope.verb,
            &envelope.data,
            envelope.signature.as_deref(),
        ) {
            return reject_auth(e);
        }

        if envelope.verb.is_empty() {
            return ApiOutcome::Banner(self.config.service_name.clone());
        }

        let verb = match Verb::parse(&envelope.verb) {
            Ok(verb) => verb,
            Err(e) => {
                debug!(verb = %envelope.verb, "unsupported verb");
                return ApiOutcome::Response(ApiResponse::fail(e.to_string()));
            }
        };

        let request = match decode_request(verb, &envelope.data) {
            Ok(request) => request,
            Err(e) => {
                warn!(verb = %envelope.verb, %e, "malformed payload");
                return ApiOutcome::Rejected(400);
            }
        };

        match self.registry.dispatch(request).await {
            Ok(Response::Record(record)) => {
                ApiOutcome::Response(ApiResponse::ok(Some(public_to_value(&record))))
            }
            Ok(Response::Names(names)) => ApiOutcome::Response(ApiResponse::ok(Some(
                Value::Array(names.into_iter().map(Value::String).collect()),
            ))),
            Ok(Response::Done) => ApiOutcome::Response(ApiResponse::ok(None)),
            Err(RegistryError::Store(e)) => {
                error!(verb = %envelope.verb, %e, "storage failure");
                ApiOutcome::Rejected(500)
            }
            Err(e) => ApiOutcome::Response(ApiResponse::fail(e.to_string())),
        }
    }

    /// Handle a public jump: resolve the first path segment and build the
    /// redirect location.
    ///
    /// `path` is the request path without the leading slash, plus any query
    /// string (e.g. `"b/deep/page?x=1"`).
    pub async fn handle_jump(&self, path: &str) -> JumpOutcome {
        let (name, rest) = split_jump_path(path);

        match self.registry.find(name).await {
            Ok(record) => {
                let location = if self.config.rewrite_path && !rest.is_empty() {
                    format!("{}{}", record.href, rest)
                } else {
                    record.href
                };
                debug!(name, %location, "jump");
                JumpOutcome::Redirect(location)
            }
            Err(RegistryError::Store(e)) => {
                error!(name, %e, "storage failure on jump");
                JumpOutcome::ServerError
            }
            Err(_) => JumpOutcome::NotFound,
        }
    }
}

/// Map an authentication failure to a transport rejection.
fn reject_auth(e: AuthError) -> ApiOutcome {
    match e {
        AuthError::SignatureMissing => ApiOutcome::Rejected(401),
        AuthError::SignatureInvalid | AuthError::LegacyModeRefused => ApiOutcome::Rejected(403),
        _ => ApiOutcome::Rejected(400),
    }
}

fn decode_request(verb: Verb, data: &Value) -> Result<Request, serde_json::Error> {
    Ok(match verb {
        Verb::Bind => {
            let p: BindPayload = serde_json::from_value(data.clone())?;
            Request::Bind {
                name: p.name,
                href: p.href,
                code: p.code,
            }
        }
        Verb::Kill => {
            let p: KillPayload = serde_json::from_value(data.clone())?;
            Request::Kill {
                name: p.name,
                code: p.code,
            }
        }
        Verb::Find => {
            let p: FindPayload = serde_json::from_value(data.clone())?;
            Request::Find { name: p.name }
        }
        Verb::List => Request::List,
    })
}

fn public_to_value(record: &PublicRecord) -> Value {
    serde_json::json!({
        "name": record.name,
        "href": record.href,
        "time": record.time,
    })
}

/// Split a jump path into the name and the remainder to append to the href.
///
/// `"b"` → `("b", "")`; `"b/deep?x=1"` → `("b", "/deep?x=1")`;
/// `"b?x=1"` → `("b", "?x=1")`.
fn split_jump_path(path: &str) -> (&str, &str) {
    let end = path
        .find(|c| c == '/' || c == '?')
        .unwrap_or(path.len());
    (&path[..end], &path[end..])
}
