//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;

use namehop::auth::{AuthConfig, AuthMode, Authenticator, Envelope};
use namehop::store::MemoryStore;
use namehop::{
    ApiOutcome, ApiResponse, DispatchConfig, Dispatcher, Keypair, Registry, RegistryConfig,
};
use serde_json::Value;

/// A test fixture: a dispatcher over a memory store, with the signing side
/// of the keypair held locally so tests can produce valid envelopes.
pub struct TestFixture {
    pub keypair: Keypair,
    pub dispatcher: Dispatcher<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture with a deterministic default keypair.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    /// Create with an explicit keypair seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_mode(seed, AuthMode::Ed25519)
    }

    /// Create with an explicit seed and authentication mode.
    pub fn with_mode(seed: [u8; 32], mode: AuthMode) -> Self {
        let keypair = Keypair::from_seed(&seed);
        let auth = Authenticator::new(
            AuthConfig::new(keypair.public_key())
                .with_signing_key(Keypair::from_seed(&seed))
                .with_mode(mode),
        );
        let registry = Registry::new(MemoryStore::new(), RegistryConfig::default());
        Self {
            keypair,
            dispatcher: Dispatcher::new(registry, auth, DispatchConfig::default()),
        }
    }

    /// Build a correctly signed envelope for the fixture's keypair.
    pub fn signed(&self, verb: &str, data: Value) -> Envelope {
        let auth = Authenticator::new(
            AuthConfig::new(self.keypair.public_key())
                .with_signing_key(Keypair::from_seed(&self.keypair.seed())),
        );
        let signature = auth.sign(verb, &data).expect("signing test envelope");
        Envelope {
            verb: verb.to_string(),
            data,
            signature: Some(signature),
        }
    }

    /// Call the control surface and unwrap the 200-level response body.
    ///
    /// Panics on a transport rejection; use
    /// [`Dispatcher::handle_api`] directly to assert on those.
    pub async fn call(&self, verb: &str, data: Value) -> ApiResponse {
        match self.dispatcher.handle_api(&self.signed(verb, data)).await {
            ApiOutcome::Response(response) => response,
            other => panic!("expected a response body, got {other:?}"),
        }
    }

    /// Bind a name, asserting success.
    pub async fn bind(&self, name: &str, href: &str, code: Option<&str>) {
        let mut data = serde_json::json!({"name": name, "href": href});
        if let Some(code) = code {
            data["code"] = Value::String(code.to_string());
        }
        let response = self.call("bind", data).await;
        assert!(response.state, "bind failed: {:?}", response.error);
    }

    /// Write the fixture's keys as hex keyfiles, returning
    /// `(verifying, signing)` paths.
    pub fn write_keyfiles(&self, dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let pub_path = dir.join("registry.pub");
        let key_path = dir.join("registry.key");
        std::fs::write(&pub_path, self.keypair.public_key().to_hex()).expect("write pub keyfile");
        std::fs::write(&key_path, hex::encode(self.keypair.seed())).expect("write keyfile");
        (pub_path, key_path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namehop::JumpOutcome;

    #[tokio::test]
    async fn test_fixture_roundtrip() {
        let fixture = TestFixture::new();
        fixture.bind("a", "https://a1.test.com", None).await;

        let found = fixture.call("find", serde_json::json!({"name": "a"})).await;
        assert_eq!(found.model.unwrap()["href"], "https://a1.test.com");

        match fixture.dispatcher.handle_jump("a").await {
            JumpOutcome::Redirect(location) => assert_eq!(location, "https://a1.test.com"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fixture_rejects_foreign_signature() {
        let fixture = TestFixture::new();
        let foreign = TestFixture::with_seed([0x07; 32]);

        let envelope = foreign.signed("list", serde_json::json!({}));
        assert_eq!(
            fixture.dispatcher.handle_api(&envelope).await,
            ApiOutcome::Rejected(403)
        );
    }

    #[test]
    fn test_keyfiles_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = TestFixture::new();
        let (pub_path, key_path) = fixture.write_keyfiles(dir.path());

        let verifying = namehop::auth::load_verifying_key(&pub_path).unwrap();
        let signing = namehop::auth::load_signing_key(&key_path).unwrap();
        assert_eq!(verifying, fixture.keypair.public_key());
        assert_eq!(signing.public_key(), fixture.keypair.public_key());
    }
}
