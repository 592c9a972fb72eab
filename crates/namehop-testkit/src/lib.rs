//! # namehop testkit
//!
//! Testing utilities for namehop.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a ready-made dispatcher over a memory store, with
//!   envelope-signing helpers
//! - **Generators**: proptest strategies for names, hrefs, codes, and
//!   records
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use namehop_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let response = fixture.call("bind", serde_json::json!({
//!     "name": "a",
//!     "href": "https://a1.test.com",
//! })).await;
//! assert!(response.state);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use namehop_testkit::generators::{record_from_params, RecordParams};
//!
//! proptest! {
//!     #[test]
//!     fn claimed_records_verify(params: RecordParams) {
//!         let record = record_from_params(&params);
//!         prop_assert!(record.verify_ownership(params.code.as_deref()));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;
pub use generators::{record_from_params, RecordParams};
