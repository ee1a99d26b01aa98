//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use accredit::{
    Accredit, CallContext, CredentialHash, CredentialVerification, MemoryStore, NewCredential,
    RegistryConfig, Result,
};
use rand::RngCore;

/// Controller principal used by every fixture.
pub const CONTROLLER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

/// A memory-backed registry with [`CONTROLLER`] as controller.
pub struct TestFixture {
    pub registry: Accredit<MemoryStore>,
}

impl TestFixture {
    /// Fixture with the overwrite policy.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::new(CONTROLLER))
    }

    /// Fixture with the reject policy.
    pub fn strict() -> Self {
        Self::with_config(RegistryConfig::new(CONTROLLER).strict())
    }

    /// Fixture with a custom configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            registry: Accredit::in_memory(config),
        }
    }

    /// Context for the controller at `height`.
    pub fn controller_at(&self, height: u64) -> CallContext {
        CallContext::new(height, self.registry.config().controller.clone())
    }

    /// Context for an arbitrary caller at `height`.
    pub fn caller_at(&self, caller: &str, height: u64) -> CallContext {
        CallContext::new(height, caller)
    }

    /// Register `id` with placeholder metadata.
    pub fn register(&self, id: &str, height: u64) -> Result<()> {
        self.registry.institutions().register_institution(
            &self.controller_at(height),
            id,
            format!("Institution {id}"),
            format!("https://{id}.example.edu"),
        )
    }

    /// Register and verify `id` at `height`.
    pub fn register_and_verify(&self, id: &str, height: u64) -> Result<()> {
        self.register(id, height)?;
        self.registry
            .institutions()
            .verify_institution(&self.controller_at(height), id)
    }

    /// Grant issuance rights to `id`.
    pub fn authorize(&self, id: &str, height: u64) -> Result<()> {
        self.registry
            .credentials()
            .authorize_institution(&self.controller_at(height), id)
    }

    /// Issue a bachelor's credential `hash` from `institution` at `issued_at`.
    pub fn issue(&self, hash: &str, institution: &str, issued_at: u64, expires_at: u64) -> Result<()> {
        let request = NewCredential::new(hash, institution, "student-123", "bachelor", expires_at)
            .metadata("Computer Science Degree");
        self.registry
            .credentials()
            .issue_credential(&self.controller_at(issued_at), request)
    }

    /// Verify `hash` at `height`.
    pub fn verify(&self, hash: &str, height: u64) -> Result<CredentialVerification> {
        self.registry
            .credentials()
            .verify_credential(&self.controller_at(height), hash)
    }

    /// Revoke `hash` at `height` as the controller.
    pub fn revoke(&self, hash: &str, height: u64) -> Result<()> {
        self.registry
            .credentials()
            .revoke_credential(&self.controller_at(height), hash)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash of a fresh random 32-byte document.
pub fn random_hash() -> CredentialHash {
    let mut document = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut document);
    CredentialHash::of_document(&document)
}

/// Install a test-writer tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
