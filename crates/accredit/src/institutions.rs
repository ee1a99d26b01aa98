//! Institution registry: which institutions exist and whether their
//! identity has been verified.
//!
//! Verification here says nothing about issuance rights; those live in the
//! credential ledger's issuer set.

use std::sync::Arc;

use accredit_core::{CallContext, Institution, InstitutionId};
use accredit_store::{InsertResult, Store};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// Registration and verification of institutions.
pub struct InstitutionRegistry<S: Store> {
    store: Arc<S>,
    config: Arc<RegistryConfig>,
}

impl<S: Store> Clone for InstitutionRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Store> InstitutionRegistry<S> {
    /// Create a registry over a shared store.
    pub fn new(store: Arc<S>, config: Arc<RegistryConfig>) -> Self {
        Self { store, config }
    }

    /// Register an institution as unverified.
    ///
    /// Any caller may register. Under the overwrite policy an existing id is
    /// replaced (and loses its verification); under the reject policy it
    /// fails with `InstitutionExists`.
    pub fn register_institution(
        &self,
        ctx: &CallContext,
        id: impl Into<InstitutionId>,
        name: impl Into<String>,
        website: impl Into<String>,
    ) -> Result<()> {
        let institution = Institution::new(id.into(), name, website);
        let mode = self.config.duplicates.write_mode();

        match self.store.insert_institution(&institution, mode)? {
            InsertResult::Inserted => {
                tracing::info!(
                    institution_id = %institution.id,
                    caller = %ctx.caller,
                    height = ctx.height.value(),
                    "institution registered"
                );
                Ok(())
            }
            InsertResult::Replaced => {
                tracing::warn!(
                    institution_id = %institution.id,
                    caller = %ctx.caller,
                    height = ctx.height.value(),
                    "institution re-registered, previous record replaced"
                );
                Ok(())
            }
            InsertResult::AlreadyExists => Err(RegistryError::InstitutionExists(institution.id)),
        }
    }

    /// Mark an institution verified at the current height.
    ///
    /// Controller only. Verifying twice rewrites `verification_date`.
    pub fn verify_institution(&self, ctx: &CallContext, id: impl Into<InstitutionId>) -> Result<()> {
        self.config.require_controller(ctx, "verify institution")?;

        let id = id.into();
        let institution = self
            .store
            .update_institution(&id, &mut |institution| {
                institution.mark_verified(ctx.height)
            })?
            .ok_or(RegistryError::InstitutionNotFound(id))?;

        tracing::info!(
            institution_id = %institution.id,
            height = institution.verification_date.value(),
            "institution verified"
        );
        Ok(())
    }

    /// Whether a registered institution is verified.
    pub fn is_institution_verified(&self, id: impl Into<InstitutionId>) -> Result<bool> {
        let id = id.into();
        let institution = self
            .store
            .get_institution(&id)?
            .ok_or(RegistryError::InstitutionNotFound(id))?;
        Ok(institution.verified)
    }

    /// The full record, if registered.
    pub fn get_institution_details(
        &self,
        id: impl Into<InstitutionId>,
    ) -> Result<Option<Institution>> {
        let id = id.into();
        tracing::debug!(institution_id = %id, "institution lookup");
        Ok(self.store.get_institution(&id)?)
    }
}
