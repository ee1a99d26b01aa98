//! Credential ledger: issuer authorization, issuance, verification and
//! revocation of credentials.
//!
//! The ledger keeps its own issuer set and never consults the institution
//! registry. Validity is recomputed from the call height on every read.

use std::sync::Arc;

use accredit_core::{
    AuthorizedIssuer, CallContext, Credential, CredentialHash, CredentialStatus,
    CredentialVerification, InstitutionId, NewCredential,
};
use accredit_store::{InsertResult, Store};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// Issuance rights and credential records.
pub struct CredentialLedger<S: Store> {
    store: Arc<S>,
    config: Arc<RegistryConfig>,
}

impl<S: Store> Clone for CredentialLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Store> CredentialLedger<S> {
    /// Create a ledger over a shared store.
    pub fn new(store: Arc<S>, config: Arc<RegistryConfig>) -> Self {
        Self { store, config }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuer Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant issuance rights. Controller only.
    ///
    /// No check that the institution is registered or verified.
    pub fn authorize_institution(
        &self,
        ctx: &CallContext,
        institution_id: impl Into<InstitutionId>,
    ) -> Result<()> {
        self.config.require_controller(ctx, "authorize institution")?;

        let issuer = AuthorizedIssuer::granted(institution_id.into());
        self.store.upsert_issuer(&issuer)?;

        tracing::info!(
            institution_id = %issuer.institution_id,
            height = ctx.height.value(),
            "issuer authorized"
        );
        Ok(())
    }

    /// Withdraw issuance rights. Controller only.
    ///
    /// Credentials already issued are untouched.
    pub fn deauthorize_institution(
        &self,
        ctx: &CallContext,
        institution_id: impl Into<InstitutionId>,
    ) -> Result<()> {
        self.config
            .require_controller(ctx, "deauthorize institution")?;

        let issuer = AuthorizedIssuer::withdrawn(institution_id.into());
        self.store.upsert_issuer(&issuer)?;

        tracing::info!(
            institution_id = %issuer.institution_id,
            height = ctx.height.value(),
            "issuer deauthorized"
        );
        Ok(())
    }

    /// Whether an institution currently holds issuance rights. Unknown ids
    /// are not authorized.
    pub fn is_institution_authorized(
        &self,
        institution_id: impl Into<InstitutionId>,
    ) -> Result<bool> {
        let id = institution_id.into();
        Ok(self
            .store
            .get_issuer(&id)?
            .map(|issuer| issuer.authorized)
            .unwrap_or(false))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credential Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a credential issued at the current height.
    ///
    /// The issuing institution must be authorized. Under the overwrite policy
    /// an existing hash is replaced; under the reject policy it fails with
    /// `CredentialExists`.
    pub fn issue_credential(&self, ctx: &CallContext, request: NewCredential) -> Result<()> {
        if !self.is_institution_authorized(request.institution_id.clone())? {
            tracing::warn!(
                institution_id = %request.institution_id,
                hash = %request.hash,
                height = ctx.height.value(),
                "issuance by unauthorized institution"
            );
            return Err(RegistryError::IssuerNotAuthorized(request.institution_id));
        }

        let credential = request.into_credential(ctx.height);
        let mode = self.config.duplicates.write_mode();

        match self.store.insert_credential(&credential, mode)? {
            InsertResult::Inserted => {}
            InsertResult::Replaced => {
                tracing::warn!(hash = %credential.hash, "credential hash reused, previous record replaced");
            }
            InsertResult::AlreadyExists => {
                return Err(RegistryError::CredentialExists(credential.hash));
            }
        }

        tracing::info!(
            hash = %credential.hash,
            institution_id = %credential.institution_id,
            student_id = %credential.student_id,
            credential_type = %credential.credential_type,
            issue_date = credential.issue_date.value(),
            expiration_date = credential.expiration_date.value(),
            "credential issued"
        );
        Ok(())
    }

    /// The stored record together with its validity at the current height.
    pub fn verify_credential(
        &self,
        ctx: &CallContext,
        hash: impl Into<CredentialHash>,
    ) -> Result<CredentialVerification> {
        let credential = self.load(hash.into())?;
        let verification = CredentialVerification::at(credential, ctx.height);

        tracing::debug!(
            hash = %verification.credential.hash,
            height = ctx.height.value(),
            valid = verification.valid,
            "credential verified"
        );
        Ok(verification)
    }

    /// Valid, expired, or revoked at the current height.
    pub fn credential_status(
        &self,
        ctx: &CallContext,
        hash: impl Into<CredentialHash>,
    ) -> Result<CredentialStatus> {
        Ok(self.load(hash.into())?.status_at(ctx.height))
    }

    /// The stored record, if any. No validity evaluation.
    pub fn get_credential(&self, hash: impl Into<CredentialHash>) -> Result<Option<Credential>> {
        Ok(self.store.get_credential(&hash.into())?)
    }

    /// Expire a credential at the current height. Controller only.
    ///
    /// Sets `expiration_date` to the call height, so the credential reads as
    /// invalid from this height on. Revoking again moves the date again; the
    /// first revocation height stays in `revoked_at`.
    pub fn revoke_credential(&self, ctx: &CallContext, hash: impl Into<CredentialHash>) -> Result<()> {
        self.config.require_controller(ctx, "revoke credential")?;

        let hash = hash.into();
        let credential = self
            .store
            .update_credential(&hash, &mut |credential| credential.revoke(ctx.height))?
            .ok_or(RegistryError::CredentialNotFound(hash))?;

        tracing::info!(
            hash = %credential.hash,
            institution_id = %credential.institution_id,
            height = ctx.height.value(),
            "credential revoked"
        );
        Ok(())
    }

    fn load(&self, hash: CredentialHash) -> Result<Credential> {
        self.store
            .get_credential(&hash)?
            .ok_or(RegistryError::CredentialNotFound(hash))
    }
}
