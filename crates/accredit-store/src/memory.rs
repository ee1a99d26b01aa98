//! In-memory implementation of the Store trait.
//!
//! The default backend. One `RwLock` guards all three maps, so every call,
//! including `update_*` and `snapshot`, sees a single consistent state.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use accredit_core::{AuthorizedIssuer, Credential, CredentialHash, Institution, InstitutionId};

use crate::error::{Result, StoreError};
use crate::snapshot::Snapshot;
use crate::traits::{InsertResult, Store, WriteMode};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped unless the host took a
/// [`Snapshot`] first.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Institutions indexed by id.
    institutions: BTreeMap<InstitutionId, Institution>,

    /// Issuer entries indexed by institution id.
    issuers: BTreeMap<InstitutionId, AuthorizedIssuer>,

    /// Credentials indexed by hash.
    credentials: BTreeMap<CredentialHash, Credential>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let inner = MemoryStoreInner {
            institutions: snapshot
                .institutions
                .iter()
                .map(|i| (i.id.clone(), i.clone()))
                .collect(),
            issuers: snapshot
                .issuers
                .iter()
                .map(|i| (i.institution_id.clone(), i.clone()))
                .collect(),
            credentials: snapshot
                .credentials
                .iter()
                .map(|c| (c.hash.clone(), c.clone()))
                .collect(),
        };
        Self {
            inner: RwLock::new(inner),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared write path for all three maps.
fn write_entry<K: Ord, V: Clone>(
    map: &mut BTreeMap<K, V>,
    key: K,
    value: &V,
    mode: WriteMode,
) -> InsertResult {
    match (map.contains_key(&key), mode) {
        (true, WriteMode::InsertOnly) => InsertResult::AlreadyExists,
        (true, WriteMode::Upsert) => {
            map.insert(key, value.clone());
            InsertResult::Replaced
        }
        (false, _) => {
            map.insert(key, value.clone());
            InsertResult::Inserted
        }
    }
}

impl Store for MemoryStore {
    fn get_institution(&self, id: &InstitutionId) -> Result<Option<Institution>> {
        Ok(self.read()?.institutions.get(id).cloned())
    }

    fn insert_institution(
        &self,
        institution: &Institution,
        mode: WriteMode,
    ) -> Result<InsertResult> {
        let mut inner = self.write()?;
        Ok(write_entry(
            &mut inner.institutions,
            institution.id.clone(),
            institution,
            mode,
        ))
    }

    fn update_institution(
        &self,
        id: &InstitutionId,
        update: &mut dyn FnMut(&mut Institution),
    ) -> Result<Option<Institution>> {
        let mut inner = self.write()?;
        Ok(inner.institutions.get_mut(id).map(|institution| {
            update(institution);
            institution.clone()
        }))
    }

    fn list_institutions(&self) -> Result<Vec<Institution>> {
        Ok(self.read()?.institutions.values().cloned().collect())
    }

    fn get_issuer(&self, id: &InstitutionId) -> Result<Option<AuthorizedIssuer>> {
        Ok(self.read()?.issuers.get(id).cloned())
    }

    fn upsert_issuer(&self, issuer: &AuthorizedIssuer) -> Result<InsertResult> {
        let mut inner = self.write()?;
        Ok(write_entry(
            &mut inner.issuers,
            issuer.institution_id.clone(),
            issuer,
            WriteMode::Upsert,
        ))
    }

    fn list_issuers(&self) -> Result<Vec<AuthorizedIssuer>> {
        Ok(self.read()?.issuers.values().cloned().collect())
    }

    fn get_credential(&self, hash: &CredentialHash) -> Result<Option<Credential>> {
        Ok(self.read()?.credentials.get(hash).cloned())
    }

    fn insert_credential(&self, credential: &Credential, mode: WriteMode) -> Result<InsertResult> {
        let mut inner = self.write()?;
        Ok(write_entry(
            &mut inner.credentials,
            credential.hash.clone(),
            credential,
            mode,
        ))
    }

    fn update_credential(
        &self,
        hash: &CredentialHash,
        update: &mut dyn FnMut(&mut Credential),
    ) -> Result<Option<Credential>> {
        let mut inner = self.write()?;
        Ok(inner.credentials.get_mut(hash).map(|credential| {
            update(credential);
            credential.clone()
        }))
    }

    fn list_credentials(&self) -> Result<Vec<Credential>> {
        Ok(self.read()?.credentials.values().cloned().collect())
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let inner = self.read()?;
        Ok(Snapshot {
            institutions: inner.institutions.values().cloned().collect(),
            issuers: inner.issuers.values().cloned().collect(),
            credentials: inner.credentials.values().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use accredit_core::{BlockHeight, NewCredential};

    fn make_credential(hash: &str, expires: u64) -> Credential {
        NewCredential::new(hash, "mit-001", "student-123", "bachelor", expires)
            .into_credential(BlockHeight::new(100))
    }

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let inst = Institution::new("mit-001".into(), "MIT", "https://mit.edu");

        let result = store.insert_institution(&inst, WriteMode::Upsert).unwrap();
        assert_eq!(result, InsertResult::Inserted);

        let retrieved = store.get_institution(&inst.id).unwrap().unwrap();
        assert_eq!(retrieved, inst);
        assert!(store
            .get_institution(&"unknown".into())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_upsert_replaces() {
        let store = MemoryStore::new();
        let first = make_credential("h1", 200);
        let second = make_credential("h1", 400);

        assert_eq!(
            store.insert_credential(&first, WriteMode::Upsert).unwrap(),
            InsertResult::Inserted
        );
        assert_eq!(
            store.insert_credential(&second, WriteMode::Upsert).unwrap(),
            InsertResult::Replaced
        );

        let stored = store.get_credential(&"h1".into()).unwrap().unwrap();
        assert_eq!(stored.expiration_date, BlockHeight::new(400));
    }

    #[test]
    fn test_insert_only_keeps_existing() {
        let store = MemoryStore::new();
        let first = make_credential("h1", 200);
        let second = make_credential("h1", 400);

        store.insert_credential(&first, WriteMode::InsertOnly).unwrap();
        let result = store
            .insert_credential(&second, WriteMode::InsertOnly)
            .unwrap();

        assert_eq!(result, InsertResult::AlreadyExists);
        let stored = store.get_credential(&"h1".into()).unwrap().unwrap();
        assert_eq!(stored.expiration_date, BlockHeight::new(200));
    }

    #[test]
    fn test_issuer_upsert() {
        let store = MemoryStore::new();
        let id: InstitutionId = "harvard-001".into();

        store
            .upsert_issuer(&AuthorizedIssuer::granted(id.clone()))
            .unwrap();
        let result = store
            .upsert_issuer(&AuthorizedIssuer::withdrawn(id.clone()))
            .unwrap();

        assert_eq!(result, InsertResult::Replaced);
        assert!(!store.get_issuer(&id).unwrap().unwrap().authorized);
    }

    #[test]
    fn test_list_is_ordered_by_key() {
        let store = MemoryStore::new();
        for hash in ["c", "a", "b"] {
            store
                .insert_credential(&make_credential(hash, 200), WriteMode::Upsert)
                .unwrap();
        }

        let hashes: Vec<String> = store
            .list_credentials()
            .unwrap()
            .into_iter()
            .map(|c| c.hash.into_inner())
            .collect();
        assert_eq!(hashes, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_credential_in_place() {
        let store = MemoryStore::new();
        store
            .insert_credential(&make_credential("h1", 300), WriteMode::Upsert)
            .unwrap();

        let updated = store
            .update_credential(&"h1".into(), &mut |c| c.revoke(BlockHeight::new(140)))
            .unwrap()
            .unwrap();

        assert_eq!(updated.expiration_date, BlockHeight::new(140));
        assert_eq!(store.get_credential(&"h1".into()).unwrap().unwrap(), updated);
    }

    #[test]
    fn test_update_unknown_key_writes_nothing() {
        let store = MemoryStore::new();
        let mut called = false;

        let result = store
            .update_institution(&"ghost-001".into(), &mut |_| called = true)
            .unwrap();

        assert!(result.is_none());
        assert!(!called);
        assert!(store.list_institutions().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_credential(&make_credential("h1", 300), WriteMode::Upsert)
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store
                            .update_credential(&"h1".into(), &mut |c| c.metadata.push('x'))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get_credential(&"h1".into()).unwrap().unwrap();
        assert_eq!(stored.metadata.len(), 8 * 50);
    }

    #[test]
    fn test_snapshot_matches_lists() {
        let store = MemoryStore::new();
        store
            .insert_institution(
                &Institution::new("mit-001".into(), "MIT", "https://mit.edu"),
                WriteMode::Upsert,
            )
            .unwrap();
        store
            .upsert_issuer(&AuthorizedIssuer::granted("mit-001".into()))
            .unwrap();
        store
            .insert_credential(&make_credential("h1", 200), WriteMode::Upsert)
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.institutions, store.list_institutions().unwrap());
        assert_eq!(snapshot.issuers, store.list_issuers().unwrap());
        assert_eq!(snapshot.credentials, store.list_credentials().unwrap());
    }
}
