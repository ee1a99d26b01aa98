//! Error types for registry operations.

use accredit_core::{CredentialHash, InstitutionId, Principal};
use accredit_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A privileged operation was called by someone other than the controller.
    #[error("forbidden: {caller} may not {operation}")]
    Forbidden {
        operation: &'static str,
        caller: Principal,
    },

    /// Issuance requested by an institution without issuance rights.
    #[error("institution not authorized to issue: {0}")]
    IssuerNotAuthorized(InstitutionId),

    /// Institution not registered.
    #[error("institution not found: {0}")]
    InstitutionNotFound(InstitutionId),

    /// No credential under this hash.
    #[error("credential not found: {0}")]
    CredentialNotFound(CredentialHash),

    /// Re-registration refused under the reject policy.
    #[error("institution already registered: {0}")]
    InstitutionExists(InstitutionId),

    /// Re-issuance refused under the reject policy.
    #[error("credential already issued: {0}")]
    CredentialExists(CredentialHash),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Forbidden,
    NotFound,
    AlreadyExists,
    Storage,
}

impl ErrorKind {
    /// Numeric code as reported to hosts.
    pub const fn code(self) -> u16 {
        match self {
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::AlreadyExists => 409,
            ErrorKind::Storage => 500,
        }
    }
}

impl RegistryError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Forbidden { .. } | RegistryError::IssuerNotAuthorized(_) => {
                ErrorKind::Forbidden
            }
            RegistryError::InstitutionNotFound(_) | RegistryError::CredentialNotFound(_) => {
                ErrorKind::NotFound
            }
            RegistryError::InstitutionExists(_) | RegistryError::CredentialExists(_) => {
                ErrorKind::AlreadyExists
            }
            RegistryError::Store(_) => ErrorKind::Storage,
        }
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> u16 {
        self.kind().code()
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let forbidden = RegistryError::Forbidden {
            operation: "revoke credential",
            caller: "mallory".into(),
        };
        assert_eq!(forbidden.code(), 403);
        assert_eq!(forbidden.to_string(), "forbidden: mallory may not revoke credential");

        assert_eq!(RegistryError::IssuerNotAuthorized("x".into()).code(), 403);
        assert_eq!(RegistryError::InstitutionNotFound("x".into()).code(), 404);
        assert_eq!(RegistryError::CredentialNotFound("h".into()).code(), 404);
        assert_eq!(RegistryError::CredentialExists("h".into()).code(), 409);
        assert_eq!(
            RegistryError::from(StoreError::LockPoisoned("boom".into())).kind(),
            ErrorKind::Storage
        );
    }
}
