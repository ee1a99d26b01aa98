//! The Accredit facade: both registry components over one shared store.

use std::sync::Arc;

use accredit_store::{MemoryStore, Snapshot, Store};

use crate::config::RegistryConfig;
use crate::credentials::CredentialLedger;
use crate::error::Result;
use crate::institutions::InstitutionRegistry;

/// The registry a host constructs once and keeps for its lifetime.
///
/// Provides:
/// - The institution registry (register, verify, query)
/// - The credential ledger (authorize issuers, issue, verify, revoke)
/// - Snapshots of the shared store for host-side persistence
pub struct Accredit<S: Store> {
    store: Arc<S>,
    config: Arc<RegistryConfig>,
    institutions: InstitutionRegistry<S>,
    credentials: CredentialLedger<S>,
}

impl<S: Store> Accredit<S> {
    /// Create a registry owning `store`.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a registry over a store the host already shares elsewhere.
    pub fn with_shared_store(store: Arc<S>, config: RegistryConfig) -> Self {
        let config = Arc::new(config);
        Self {
            institutions: InstitutionRegistry::new(Arc::clone(&store), Arc::clone(&config)),
            credentials: CredentialLedger::new(Arc::clone(&store), Arc::clone(&config)),
            store,
            config,
        }
    }

    /// The institution registry.
    pub fn institutions(&self) -> &InstitutionRegistry<S> {
        &self.institutions
    }

    /// The credential ledger.
    pub fn credentials(&self) -> &CredentialLedger<S> {
        &self.credentials
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Capture every record in the store.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot::capture(self.store.as_ref())?)
    }

    /// Blake3 digest over the canonical snapshot bytes.
    pub fn state_root(&self) -> Result<String> {
        Ok(self.snapshot()?.digest()?)
    }
}

impl Accredit<MemoryStore> {
    /// An empty registry backed by memory.
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self::new(MemoryStore::new(), config)
    }

    /// Rebuild a memory-backed registry from a snapshot.
    pub fn restore(snapshot: &Snapshot, config: RegistryConfig) -> Self {
        tracing::info!(records = snapshot.len(), "restoring registry from snapshot");
        Self::new(MemoryStore::from_snapshot(snapshot), config)
    }
}
