//! Registry configuration.
//!
//! ```json
//! { "controller": "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM", "duplicates": "reject" }
//! ```

use serde::{Deserialize, Serialize};

use accredit_core::{CallContext, Principal};
use accredit_store::WriteMode;

use crate::error::{RegistryError, Result};

/// What happens when an institution id or credential hash is written twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later write replaces the earlier record.
    #[default]
    Overwrite,
    /// The later write fails with an `AlreadyExists` error.
    Reject,
}

impl DuplicatePolicy {
    pub(crate) fn write_mode(self) -> WriteMode {
        match self {
            DuplicatePolicy::Overwrite => WriteMode::Upsert,
            DuplicatePolicy::Reject => WriteMode::InsertOnly,
        }
    }
}

/// Configuration shared by both registry components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The only principal allowed to verify institutions, grant or withdraw
    /// issuance rights and revoke credentials.
    pub controller: Principal,

    /// Handling of duplicate institution ids and credential hashes.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl RegistryConfig {
    /// Configuration with the overwrite policy.
    pub fn new(controller: impl Into<Principal>) -> Self {
        Self {
            controller: controller.into(),
            duplicates: DuplicatePolicy::Overwrite,
        }
    }

    /// Switch to the reject policy.
    pub fn strict(mut self) -> Self {
        self.duplicates = DuplicatePolicy::Reject;
        self
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Fail with `Forbidden` unless the caller is the controller.
    pub(crate) fn require_controller(
        &self,
        ctx: &CallContext,
        operation: &'static str,
    ) -> Result<()> {
        if ctx.is_caller(&self.controller) {
            return Ok(());
        }

        tracing::warn!(
            caller = %ctx.caller,
            operation,
            height = ctx.height.value(),
            "rejected privileged call"
        );
        Err(RegistryError::Forbidden {
            operation,
            caller: ctx.caller.clone(),
        })
    }
}
