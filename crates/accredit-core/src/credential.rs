//! Credential records and the validity rule.
//!
//! A credential is valid at height `h` iff `h < expiration_date`. Revocation
//! rewrites `expiration_date` to the revocation height, so a revoked
//! credential looks exactly like one that expired at that height. The
//! `revoked_at` field is an audit trail only; it never feeds validity.

use serde::{Deserialize, Serialize};

use crate::types::{BlockHeight, CredentialHash, InstitutionId, StudentId};

/// An issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Record key.
    pub hash: CredentialHash,

    /// Issuing institution (a plain id, not a reference into the institution registry).
    pub institution_id: InstitutionId,

    /// Holder.
    pub student_id: StudentId,

    /// Classification, e.g. "bachelor" or "phd".
    pub credential_type: String,

    /// Height at issuance.
    pub issue_date: BlockHeight,

    /// First height at which the credential is no longer valid.
    pub expiration_date: BlockHeight,

    /// Free-form description.
    pub metadata: String,

    /// Height of the first revocation, if any.
    pub revoked_at: Option<BlockHeight>,
}

impl Credential {
    /// Whether the credential is valid at `height`. Strict: valid up to
    /// `expiration_date - 1`.
    pub fn is_valid_at(&self, height: BlockHeight) -> bool {
        height < self.expiration_date
    }

    /// Derived status at `height`.
    pub fn status_at(&self, height: BlockHeight) -> CredentialStatus {
        if self.is_valid_at(height) {
            CredentialStatus::Valid
        } else if self.is_revoked() {
            CredentialStatus::Revoked
        } else {
            CredentialStatus::Expired
        }
    }

    /// Force expiry at `height`.
    ///
    /// Only the first revocation is kept in `revoked_at`; `expiration_date`
    /// is rewritten every time.
    pub fn revoke(&mut self, height: BlockHeight) {
        self.expiration_date = height;
        if self.revoked_at.is_none() {
            self.revoked_at = Some(height);
        }
    }

    /// Whether this credential has been revoked at least once.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Input to `issue_credential`.
///
/// `issue_date` is not part of the request; the ledger stamps it from the
/// call context. The type and the expiration height are constructor
/// arguments, so a request cannot be built without them:
///
/// ```compile_fail
/// use accredit_core::NewCredential;
///
/// let request = NewCredential::new("h1", "mit-001", "student-123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCredential {
    pub hash: CredentialHash,
    pub institution_id: InstitutionId,
    pub student_id: StudentId,
    pub credential_type: String,
    pub expiration_date: BlockHeight,
    pub metadata: String,
}

impl NewCredential {
    /// Start a request. Metadata defaults to empty.
    pub fn new(
        hash: impl Into<CredentialHash>,
        institution_id: impl Into<InstitutionId>,
        student_id: impl Into<StudentId>,
        credential_type: impl Into<String>,
        expires_at: u64,
    ) -> Self {
        Self {
            hash: hash.into(),
            institution_id: institution_id.into(),
            student_id: student_id.into(),
            credential_type: credential_type.into(),
            expiration_date: BlockHeight::new(expires_at),
            metadata: String::new(),
        }
    }

    /// Set the metadata string.
    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Materialize the stored record, issued at `issue_date`.
    pub fn into_credential(self, issue_date: BlockHeight) -> Credential {
        Credential {
            hash: self.hash,
            institution_id: self.institution_id,
            student_id: self.student_id,
            credential_type: self.credential_type,
            issue_date,
            expiration_date: self.expiration_date,
            metadata: self.metadata,
            revoked_at: None,
        }
    }
}

/// Result of `verify_credential`: the stored record plus validity at the
/// height of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialVerification {
    pub valid: bool,
    pub credential: Credential,
}

impl CredentialVerification {
    /// Evaluate `credential` at `height`.
    pub fn at(credential: Credential, height: BlockHeight) -> Self {
        Self {
            valid: credential.is_valid_at(height),
            credential,
        }
    }
}

/// Observable lifecycle state of a credential at a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialStatus {
    /// Before its expiration height.
    Valid,
    /// Past its expiration height, never revoked.
    Expired,
    /// Past its expiration height after a revocation.
    Revoked,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bachelor(expires: u64) -> Credential {
        NewCredential::new("h1", "mit-001", "student-123", "bachelor", expires)
            .metadata("Computer Science Degree")
            .into_credential(BlockHeight::new(100))
    }

    #[test]
    fn test_validity_boundary_is_strict() {
        let cred = bachelor(200);

        assert!(cred.is_valid_at(BlockHeight::new(100)));
        assert!(cred.is_valid_at(BlockHeight::new(199)));
        assert!(!cred.is_valid_at(BlockHeight::new(200)));
        assert!(!cred.is_valid_at(BlockHeight::new(201)));
    }

    #[test]
    fn test_already_expired_at_issuance() {
        let cred = bachelor(50);
        assert!(!cred.is_valid_at(cred.issue_date));
        assert_eq!(cred.status_at(cred.issue_date), CredentialStatus::Expired);
    }

    #[test]
    fn test_revoke_keeps_first_height() {
        let mut cred = bachelor(300);

        cred.revoke(BlockHeight::new(120));
        assert_eq!(cred.expiration_date, BlockHeight::new(120));
        assert_eq!(cred.revoked_at, Some(BlockHeight::new(120)));

        cred.revoke(BlockHeight::new(150));
        assert_eq!(cred.expiration_date, BlockHeight::new(150));
        assert_eq!(cred.revoked_at, Some(BlockHeight::new(120)));
        assert_eq!(cred.status_at(BlockHeight::new(150)), CredentialStatus::Revoked);
    }

    #[test]
    fn test_request_carries_required_fields() {
        let request = NewCredential::new("h1", "mit-001", "student-123", "phd", 500);

        assert_eq!(request.credential_type, "phd");
        assert_eq!(request.expiration_date, BlockHeight::new(500));
        assert!(request.metadata.is_empty());
    }

    #[test]
    fn test_into_credential_stamps_issue_date() {
        let cred = bachelor(200);

        assert_eq!(cred.issue_date, BlockHeight::new(100));
        assert_eq!(cred.credential_type, "bachelor");
        assert!(!cred.is_revoked());
    }

    proptest::proptest! {
        #[test]
        fn test_status_agrees_with_validity(expires in 0u64..10_000, at in 0u64..10_000, revoked: bool) {
            let mut cred = bachelor(expires);
            if revoked {
                cred.revoke(BlockHeight::new(expires));
            }

            let at = BlockHeight::new(at);
            let status = cred.status_at(at);
            proptest::prop_assert_eq!(status == CredentialStatus::Valid, cred.is_valid_at(at));
            proptest::prop_assert_eq!(cred.is_valid_at(at), at.value() < expires);
            if !cred.is_valid_at(at) {
                proptest::prop_assert_eq!(status == CredentialStatus::Revoked, revoked);
            }
        }
    }

    #[test]
    fn test_verification_snapshot() {
        let v = CredentialVerification::at(bachelor(200), BlockHeight::new(150));
        assert!(v.valid);

        let v = CredentialVerification::at(bachelor(200), BlockHeight::new(250));
        assert!(!v.valid);
        assert_eq!(v.credential.expiration_date, BlockHeight::new(200));
    }
}
