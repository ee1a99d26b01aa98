//! Store trait: the abstract interface for registry state.
//!
//! Three maps live behind this trait: institutions (owned by the
//! institution registry), authorized issuers and credentials (owned by the
//! credential ledger). Implementations must make every single call atomic;
//! ordering between calls is the host's responsibility.

use accredit_core::{AuthorizedIssuer, Credential, CredentialHash, Institution, InstitutionId};

use crate::error::Result;
use crate::snapshot::Snapshot;

/// How a write treats an existing record under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace whatever is there.
    Upsert,
    /// Leave an existing record untouched and report `AlreadyExists`.
    InsertOnly,
}

/// Result of writing a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// No record existed under the key.
    Inserted,
    /// An existing record was overwritten (`WriteMode::Upsert` only).
    Replaced,
    /// A record exists and was kept (`WriteMode::InsertOnly` only).
    AlreadyExists,
}

/// The Store trait: synchronous record persistence.
///
/// # Design Notes
///
/// - Records are returned by value. Read-modify-write goes through the
///   `update_*` methods, which run the closure under the same write.
/// - `list_*` methods return records ordered by key, so snapshots taken from
///   equal stores are byte-identical.
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Institutions
    // ─────────────────────────────────────────────────────────────────────────

    /// Get an institution by id.
    fn get_institution(&self, id: &InstitutionId) -> Result<Option<Institution>>;

    /// Write an institution.
    fn insert_institution(&self, institution: &Institution, mode: WriteMode)
        -> Result<InsertResult>;

    /// Apply `update` to an existing institution and return the new record.
    /// `None` if the id is unknown; nothing is written then.
    fn update_institution(
        &self,
        id: &InstitutionId,
        update: &mut dyn FnMut(&mut Institution),
    ) -> Result<Option<Institution>>;

    /// All institutions, ordered by id.
    fn list_institutions(&self) -> Result<Vec<Institution>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Authorized issuers
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the issuer entry for an institution.
    fn get_issuer(&self, id: &InstitutionId) -> Result<Option<AuthorizedIssuer>>;

    /// Create or overwrite an issuer entry.
    fn upsert_issuer(&self, issuer: &AuthorizedIssuer) -> Result<InsertResult>;

    /// All issuer entries, ordered by institution id.
    fn list_issuers(&self) -> Result<Vec<AuthorizedIssuer>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Credentials
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a credential by hash.
    fn get_credential(&self, hash: &CredentialHash) -> Result<Option<Credential>>;

    /// Write a credential.
    fn insert_credential(&self, credential: &Credential, mode: WriteMode) -> Result<InsertResult>;

    /// Apply `update` to an existing credential and return the new record.
    /// `None` if the hash is unknown; nothing is written then.
    fn update_credential(
        &self,
        hash: &CredentialHash,
        update: &mut dyn FnMut(&mut Credential),
    ) -> Result<Option<Credential>>;

    /// All credentials, ordered by hash.
    fn list_credentials(&self) -> Result<Vec<Credential>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Whole store
    // ─────────────────────────────────────────────────────────────────────────

    /// Every record at one point in time.
    ///
    /// The default lists the three maps one after another. Backends that can
    /// read all of them at once should override it so a concurrent write
    /// never lands between the lists.
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            institutions: self.list_institutions()?,
            issuers: self.list_issuers()?,
            credentials: self.list_credentials()?,
        })
    }
}
