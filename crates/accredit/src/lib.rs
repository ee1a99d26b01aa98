//! # Accredit
//!
//! A two-stage trust registry: institutions are registered and verified,
//! then separately authorized to issue credentials, which can be verified
//! and revoked.
//!
//! ## Overview
//!
//! - **Institution registry**: which institutions exist and whether their
//!   identity has been verified by the controller
//! - **Credential ledger**: which institutions may issue, and the credentials
//!   they issued, keyed by a caller-supplied hash
//!
//! The two components keep independent authorization state. Verifying an
//! institution does not let it issue; authorizing an issuer does not require
//! it to be registered.
//!
//! ## Key Concepts
//!
//! - **CallContext**: the host supplies the clock value and the caller with
//!   every operation.
//! - **Controller**: the configured principal allowed to verify, authorize
//!   and revoke.
//! - **Validity**: `height < expiration_date`, recomputed on every read.
//! - **Revocation**: rewrites `expiration_date` to the revocation height.
//!
//! ## Usage
//!
//! ```rust
//! use accredit::{Accredit, CallContext, NewCredential, RegistryConfig};
//!
//! let registry = Accredit::in_memory(RegistryConfig::new("controller"));
//! let ctx = CallContext::new(100, "controller");
//!
//! registry
//!     .institutions()
//!     .register_institution(&ctx, "mit-001", "MIT", "https://mit.edu")
//!     .unwrap();
//! registry.credentials().authorize_institution(&ctx, "mit-001").unwrap();
//! registry
//!     .credentials()
//!     .issue_credential(
//!         &ctx,
//!         NewCredential::new("h1", "mit-001", "student-123", "bachelor", 200),
//!     )
//!     .unwrap();
//!
//! assert!(registry.credentials().verify_credential(&ctx, "h1").unwrap().valid);
//! ```
//!
//! ## Re-exports
//!
//! - `accredit::core` - Records, identifiers and canonical encoding
//! - `accredit::store` - Storage abstraction and snapshots

pub mod config;
pub mod credentials;
pub mod error;
pub mod institutions;
pub mod registry;

// Re-export component crates
pub use accredit_core as core;
pub use accredit_store as store;

pub use config::{DuplicatePolicy, RegistryConfig};
pub use credentials::CredentialLedger;
pub use error::{ErrorKind, RegistryError, Result};
pub use institutions::InstitutionRegistry;
pub use registry::Accredit;

// Re-export commonly used core types
pub use accredit_core::{
    AuthorizedIssuer, BlockHeight, CallContext, Credential, CredentialHash, CredentialStatus,
    CredentialVerification, Institution, InstitutionId, NewCredential, Principal, StudentId,
};
pub use accredit_store::{MemoryStore, Snapshot, Store};
