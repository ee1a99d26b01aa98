//! Institution records and issuer authorization entries.

use serde::{Deserialize, Serialize};

use crate::types::{BlockHeight, InstitutionId};

/// A registered institution.
///
/// `verified` and `verification_date` change only through
/// [`Institution::mark_verified`]. Everything else is fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    /// Caller-assigned identifier.
    pub id: InstitutionId,

    /// Display name.
    pub name: String,

    /// Public website.
    pub website: String,

    /// Whether the controller has confirmed this institution's identity.
    pub verified: bool,

    /// Height at which the institution was verified, `0` if never.
    pub verification_date: BlockHeight,
}

impl Institution {
    /// A freshly registered, unverified institution.
    pub fn new(id: InstitutionId, name: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            website: website.into(),
            verified: false,
            verification_date: BlockHeight::ZERO,
        }
    }

    /// Record verification at `height`.
    ///
    /// Not guarded: verifying again rewrites both fields.
    pub fn mark_verified(&mut self, height: BlockHeight) {
        self.verified = true;
        self.verification_date = height;
    }
}

/// Entry in the credential ledger's issuer set.
///
/// Kept apart from [`Institution`]: being verified and being allowed to
/// issue are granted separately and can diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedIssuer {
    pub institution_id: InstitutionId,
    pub authorized: bool,
}

impl AuthorizedIssuer {
    /// An issuer entry with issuance rights.
    pub fn granted(institution_id: InstitutionId) -> Self {
        Self {
            institution_id,
            authorized: true,
        }
    }

    /// An issuer entry whose rights were withdrawn.
    pub fn withdrawn(institution_id: InstitutionId) -> Self {
        Self {
            institution_id,
            authorized: false,
        }
    }
}
