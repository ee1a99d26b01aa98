//! # Accredit Core
//!
//! Pure primitives for the Accredit registry: identifiers, the per-call
//! context, institution and credential records, and their canonical encoding.
//!
//! This crate contains no I/O, no storage, no locking. It is plain data plus
//! the validity rule for credentials.
//!
//! ## Key Types
//!
//! - [`InstitutionId`], [`CredentialHash`], [`StudentId`] - caller-assigned identifiers
//! - [`Principal`] - an opaque caller identity
//! - [`BlockHeight`] - the host-supplied clock value
//! - [`CallContext`] - clock value and caller identity for a single operation
//! - [`Institution`] - a registered institution and its verification status
//! - [`Credential`] - an issued credential and its validity window
//!
//! ## Validity
//!
//! A credential is valid at height `h` iff `h < expiration_date`. Validity is
//! never stored; see [`Credential::is_valid_at`].

pub mod canonical;
pub mod context;
pub mod credential;
pub mod error;
pub mod institution;
pub mod types;

pub use canonical::{canonical_credential_bytes, canonical_institution_bytes, record_digest};
pub use context::CallContext;
pub use credential::{Credential, CredentialStatus, CredentialVerification, NewCredential};
pub use error::CoreError;
pub use institution::{AuthorizedIssuer, Institution};
pub use types::{BlockHeight, CredentialHash, InstitutionId, Principal, StudentId};
