//! # namehop
//!
//! A tiny name registry with public redirects. A name maps to an href;
//! anyone can follow the mapping, while changing it takes two independent
//! checks: a signed request envelope, and (for claimed names) the
//! per-record ownership code.
//!
//! ## Overview
//!
//! - **Record**: one name→href binding plus its ownership proof.
//! - **Bind**: create or update a binding. First bind with a code claims
//!   the name; later changes must present the same code.
//! - **Find / List**: read the registry. Records cross the boundary only
//!   as their `{name, href, time}` view.
//! - **Kill**: delete a binding, subject to the same ownership check.
//! - **Jump**: the public redirect path; no authentication, remaining path
//!   and query carried onto the target.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use namehop::{Dispatcher, DispatchConfig, Registry, RegistryConfig};
//! use namehop::auth::{AuthConfig, Authenticator};
//! use namehop::core::Keypair;
//! use namehop::store::SqliteStore;
//!
//! async fn example() {
//!     let keypair = Keypair::generate();
//!     let store = SqliteStore::open("namehop.db").unwrap();
//!
//!     let registry = Registry::new(store, RegistryConfig::default());
//!     let auth = Authenticator::new(AuthConfig::new(keypair.public_key()));
//!     let dispatcher = Dispatcher::new(registry, auth, DispatchConfig::default());
//!
//!     let _ = dispatcher.handle_jump("b/deep/page?x=1").await;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `namehop::core` - Records, validation, proofs, crypto primitives
//! - `namehop::store` - Storage abstraction, memory and SQLite backends
//! - `namehop::auth` - Request envelope authentication

pub mod api;
pub mod backing;
pub mod cache;
pub mod error;
pub mod registry;

// Re-export component crates
pub use namehop_auth as auth;
pub use namehop_core as core;
pub use namehop_store as store;

// Re-export main types for convenience
pub use api::{ApiOutcome, ApiResponse, DispatchConfig, Dispatcher, JumpOutcome, Verb};
pub use cache::CacheConfig;
pub use error::{RegistryError, Result};
pub use registry::{Registry, RegistryConfig, Request, Response};

// Re-export commonly used core types
pub use namehop_core::{Keypair, PublicRecord, Record};
