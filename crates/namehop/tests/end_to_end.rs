//! End-to-end tests driving the dispatcher the way a transport would:
//! signed envelopes on the control surface, bare paths on the jump surface.

use namehop::auth::{AuthConfig, AuthMode, Authenticator, Envelope};
use namehop::core::Keypair;
use namehop::store::{MemoryStore, SqliteStore};
use namehop::{
    ApiOutcome, ApiResponse, DispatchConfig, Dispatcher, JumpOutcome, Registry, RegistryConfig,
};
use serde_json::{json, Value};

fn keypair() -> Keypair {
    Keypair::from_seed(&[0x42; 32])
}

fn dispatcher() -> Dispatcher<MemoryStore> {
    let registry = Registry::new(MemoryStore::new(), RegistryConfig::default());
    let auth = Authenticator::new(AuthConfig::new(keypair().public_key()).with_signing_key(keypair()));
    Dispatcher::new(registry, auth, DispatchConfig::default())
}

fn signer() -> Authenticator {
    Authenticator::new(AuthConfig::new(keypair().public_key()).with_signing_key(keypair()))
}

fn signed(verb: &str, data: Value) -> Envelope {
    let signature = signer().sign(verb, &data).unwrap();
    Envelope {
        verb: verb.to_string(),
        data,
        signature: Some(signature),
    }
}

async fn call(dispatcher: &Dispatcher<MemoryStore>, verb: &str, data: Value) -> ApiResponse {
    match dispatcher.handle_api(&signed(verb, data)).await {
        ApiOutcome::Response(response) => response,
        other => panic!("expected a response body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bind_find_jump_roundtrip() {
    let d = dispatcher();

    let bound = call(&d, "bind", json!({"name": "a", "href": "https://a1.test.com"})).await;
    assert!(bound.state);
    assert!(bound.model.is_none());
    assert!(bound.error.is_none());

    let found = call(&d, "find", json!({"name": "a"})).await;
    assert!(found.state);
    let model = found.model.unwrap();
    assert_eq!(model["name"], "a");
    assert_eq!(model["href"], "https://a1.test.com");
    assert!(model["time"].as_i64().unwrap() > 0);
    assert!(model.get("code").is_none());
    assert!(model.get("proof").is_none());

    match d.handle_jump("a").await {
        JumpOutcome::Redirect(location) => assert_eq!(location, "https://a1.test.com"),
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_jump_carries_path_and_query() {
    let d = dispatcher();
    call(&d, "bind", json!({"name": "b", "href": "https://b1.test.com"})).await;

    match d.handle_jump("b/deep/page?x=1&y=2").await {
        JumpOutcome::Redirect(location) => {
            assert_eq!(location, "https://b1.test.com/deep/page?x=1&y=2")
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_jump_unknown_name_is_not_found() {
    let d = dispatcher();
    assert_eq!(d.handle_jump("ghost").await, JumpOutcome::NotFound);
    assert_eq!(d.handle_jump("").await, JumpOutcome::NotFound);
}

#[tokio::test]
async fn test_jump_needs_no_signature() {
    let d = dispatcher();
    call(&d, "bind", json!({"name": "a", "href": "https://a1.test.com"})).await;

    // handle_jump takes a bare path; nothing about it is authenticated
    assert!(matches!(
        d.handle_jump("a").await,
        JumpOutcome::Redirect(_)
    ));
}

#[tokio::test]
async fn test_missing_signature_rejected_401() {
    let d = dispatcher();
    let envelope = Envelope {
        verb: "bind".to_string(),
        data: json!({"name": "a", "href": "https://a1.test.com"}),
        signature: None,
    };
    assert_eq!(d.handle_api(&envelope).await, ApiOutcome::Rejected(401));

    let envelope = Envelope {
        verb: "bind".to_string(),
        data: json!({"name": "a", "href": "https://a1.test.com"}),
        signature: Some(String::new()),
    };
    assert_eq!(d.handle_api(&envelope).await, ApiOutcome::Rejected(401));
}

#[tokio::test]
async fn test_invalid_signature_rejected_403() {
    let d = dispatcher();

    // Signature over different data
    let signature = signer()
        .sign("bind", &json!({"name": "a", "href": "https://evil.test.com"}))
        .unwrap();
    let envelope = Envelope {
        verb: "bind".to_string(),
        data: json!({"name": "a", "href": "https://a1.test.com"}),
        signature: Some(signature),
    };
    assert_eq!(d.handle_api(&envelope).await, ApiOutcome::Rejected(403));

    // Garbage signature
    let envelope = Envelope {
        verb: "find".to_string(),
        data: json!({"name": "a"}),
        signature: Some("deadbeef".to_string()),
    };
    assert_eq!(d.handle_api(&envelope).await, ApiOutcome::Rejected(403));

    // Nothing was bound along the way
    let listed = call(&d, "list", json!({})).await;
    assert_eq!(listed.model.unwrap(), json!([]));
}

#[tokio::test]
async fn test_empty_verb_returns_banner() {
    let d = dispatcher();
    let envelope = signed("", json!({}));
    match d.handle_api(&envelope).await {
        ApiOutcome::Banner(name) => assert_eq!(name, "namehop"),
        other => panic!("expected banner, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_verb_is_a_business_failure() {
    let d = dispatcher();
    let response = call(&d, "merge", json!({})).await;
    assert!(!response.state);
    assert_eq!(response.error.as_deref(), Some("not implemented"));
}

#[tokio::test]
async fn test_validation_failures_come_back_in_the_body() {
    let d = dispatcher();

    let cases = [
        (json!({"href": "https://a1.test.com"}), "name required"),
        (json!({"name": "a"}), "href required"),
        (json!({"name": "a", "href": "nourl"}), "invalid scheme"),
        (
            json!({"name": "a", "href": "http://localhost:3000/x"}),
            "invalid localhost",
        ),
        (
            json!({"name": "a", "href": "https://127.0.0.1/x"}),
            "invalid localhost",
        ),
    ];
    for (data, expected) in cases {
        let response = call(&d, "bind", data).await;
        assert!(!response.state);
        assert_eq!(response.error.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_ownership_end_to_end() {
    let d = dispatcher();

    // b claims the name with a code
    call(&d, "bind", json!({"name": "b", "href": "https://b1.test.com", "code": "123"})).await;

    // a tries to take it over
    let stolen =
        call(&d, "bind", json!({"name": "b", "href": "https://evil.test.com", "code": "999"})).await;
    assert!(!stolen.state);
    assert_eq!(stolen.error.as_deref(), Some("code not matched"));

    // b updates with the right code
    let updated =
        call(&d, "bind", json!({"name": "b", "href": "https://b2.test.com", "code": "123"})).await;
    assert!(updated.state);

    let found = call(&d, "find", json!({"name": "b"})).await;
    assert_eq!(found.model.unwrap()["href"], "https://b2.test.com");

    // Kill needs the code too
    let refused = call(&d, "kill", json!({"name": "b"})).await;
    assert_eq!(refused.error.as_deref(), Some("code not matched"));

    let killed = call(&d, "kill", json!({"name": "b", "code": "123"})).await;
    assert!(killed.state);

    let gone = call(&d, "find", json!({"name": "b"})).await;
    assert_eq!(gone.error.as_deref(), Some("name not found"));
}

#[tokio::test]
async fn test_idempotent_bind_same_href() {
    let d = dispatcher();
    call(&d, "bind", json!({"name": "b", "href": "https://b1.test.com", "code": "123"})).await;

    // Same href, no code: succeeds without touching the claim
    let again = call(&d, "bind", json!({"name": "b", "href": "https://b1.test.com"})).await;
    assert!(again.state);

    let moved = call(&d, "bind", json!({"name": "b", "href": "https://b2.test.com"})).await;
    assert_eq!(moved.error.as_deref(), Some("code not matched"));
}

#[tokio::test]
async fn test_list_is_complete_beyond_cache_capacity() {
    let registry = Registry::new(
        MemoryStore::new(),
        RegistryConfig {
            cache: namehop::CacheConfig {
                max_entries: 3,
                max_age: std::time::Duration::from_secs(60),
            },
        },
    );
    let auth =
        Authenticator::new(AuthConfig::new(keypair().public_key()).with_signing_key(keypair()));
    let d = Dispatcher::new(registry, auth, DispatchConfig::default());

    for i in 0..10 {
        let data = json!({"name": format!("n{i}"), "href": "https://a1.test.com"});
        let response = call(&d, "bind", data).await;
        assert!(response.state);
    }

    let listed = call(&d, "list", json!({})).await;
    let names = listed.model.unwrap();
    assert_eq!(names.as_array().unwrap().len(), 10);
    // Every binding still resolves, cached or not
    for i in 0..10 {
        assert!(matches!(
            d.handle_jump(&format!("n{i}")).await,
            JumpOutcome::Redirect(_)
        ));
    }
}

#[tokio::test]
async fn test_legacy_mode_refuses_kill_but_allows_reads() {
    let registry = Registry::new(MemoryStore::new(), RegistryConfig::default());
    let auth = Authenticator::new(
        AuthConfig::new(keypair().public_key())
            .with_signing_key(keypair())
            .with_mode(AuthMode::LegacyDigest),
    );
    let d = Dispatcher::new(registry, auth, DispatchConfig::default());
    let legacy_signer = Authenticator::new(
        AuthConfig::new(keypair().public_key()).with_mode(AuthMode::LegacyDigest),
    );

    let data = json!({"name": "a", "href": "https://a1.test.com"});
    let envelope = Envelope {
        verb: "bind".to_string(),
        signature: Some(legacy_signer.sign("bind", &data).unwrap()),
        data,
    };
    match d.handle_api(&envelope).await {
        ApiOutcome::Response(response) => assert!(response.state),
        other => panic!("expected a response body, got {other:?}"),
    }

    let data = json!({"name": "a"});
    let envelope = Envelope {
        verb: "kill".to_string(),
        signature: Some(legacy_signer.sign("kill", &data).unwrap()),
        data,
    };
    assert_eq!(d.handle_api(&envelope).await, ApiOutcome::Rejected(403));
}

#[tokio::test]
async fn test_sqlite_backed_registry_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("namehop.db");

    {
        let registry = Registry::new(SqliteStore::open(&path).unwrap(), RegistryConfig::default());
        registry
            .bind("b", "https://b1.test.com", Some("123"))
            .await
            .unwrap();
    }

    let registry = Registry::new(SqliteStore::open(&path).unwrap(), RegistryConfig::default());
    let found = registry.find("b").await.unwrap();
    assert_eq!(found.href, "https://b1.test.com");

    // The claim survived too
    let err = registry
        .bind("b", "https://b2.test.com", Some("456"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "code not matched");
    registry.kill("b", Some("123")).await.unwrap();
}
