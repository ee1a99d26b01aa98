//! # Accredit Testkit
//!
//! Testing utilities for Accredit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a memory-backed registry with a known controller and
//!   shorthand for the common register/authorize/issue steps
//! - **Generators**: proptest strategies for identifiers, heights and
//!   issuance requests
//! - **Tracing**: a test-writer subscriber so registry logs show up in
//!   failing test output
//!
//! ## Test Fixtures
//!
//! ```rust
//! use accredit_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.authorize("mit-001", 100).unwrap();
//! fixture.issue("h1", "mit-001", 100, 200).unwrap();
//!
//! assert!(fixture.verify("h1", 150).unwrap().valid);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use accredit_testkit::generators::{height, IssueParams};
//!
//! proptest! {
//!     #[test]
//!     fn validity_is_strict(params: IssueParams, at in height()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_tracing, random_hash, TestFixture, CONTROLLER};
pub use generators::{credential_hash, height, institution_id, principal, IssueParams};
