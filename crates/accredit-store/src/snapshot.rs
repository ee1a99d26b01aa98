//! Whole-store snapshots for host-side persistence.
//!
//! A snapshot is a canonical CBOR map:
//!
//! ```text
//! { 0: version, 1: [institution...], 2: [issuer...], 3: [credential...] }
//! ```
//!
//! Records are listed in key order, so two stores holding the same records
//! produce the same bytes and the same [`Snapshot::digest`].

use std::fs;
use std::path::Path;

use ciborium::value::Value;

use accredit_core::canonical::{
    credential_from_value, credential_to_value, decode_value, encode_canonical,
    institution_from_value, institution_to_value, issuer_from_value, issuer_to_value,
};
use accredit_core::{record_digest, AuthorizedIssuer, Credential, Institution};

use crate::error::{Result, StoreError};
use crate::traits::{Store, WriteMode};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u64 = 1;

mod keys {
    pub const VERSION: u64 = 0;
    pub const INSTITUTIONS: u64 = 1;
    pub const ISSUERS: u64 = 2;
    pub const CREDENTIALS: u64 = 3;
}

/// Every record in a store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub institutions: Vec<Institution>,
    pub issuers: Vec<AuthorizedIssuer>,
    pub credentials: Vec<Credential>,
}

impl Snapshot {
    /// Capture the current contents of `store`.
    pub fn capture<S: Store + ?Sized>(store: &S) -> Result<Self> {
        store.snapshot()
    }

    /// Write every record into `store`, replacing records with equal keys.
    pub fn restore_into<S: Store + ?Sized>(&self, store: &S) -> Result<()> {
        for institution in &self.institutions {
            store.insert_institution(institution, WriteMode::Upsert)?;
        }
        for issuer in &self.issuers {
            store.upsert_issuer(issuer)?;
        }
        for credential in &self.credentials {
            store.insert_credential(credential, WriteMode::Upsert)?;
        }
        tracing::debug!(
            institutions = self.institutions.len(),
            issuers = self.issuers.len(),
            credentials = self.credentials.len(),
            "snapshot restored"
        );
        Ok(())
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.institutions.len() + self.issuers.len() + self.credentials.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode to canonical CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let value = Value::Map(vec![
            (key(keys::VERSION), Value::Integer(SNAPSHOT_VERSION.into())),
            (
                key(keys::INSTITUTIONS),
                Value::Array(self.institutions.iter().map(institution_to_value).collect()),
            ),
            (
                key(keys::ISSUERS),
                Value::Array(self.issuers.iter().map(issuer_to_value).collect()),
            ),
            (
                key(keys::CREDENTIALS),
                Value::Array(self.credentials.iter().map(credential_to_value).collect()),
            ),
        ]);
        Ok(encode_canonical(&value)?)
    }

    /// Decode from bytes produced by [`Snapshot::to_bytes`].
    ///
    /// Each record list must be in strictly ascending key order. Duplicate
    /// keys would restore to a store whose digest differs from this one.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = decode_value(bytes)?;
        let map = match &value {
            Value::Map(m) => m,
            _ => return Err(StoreError::InvalidData("snapshot: expected map".into())),
        };

        let version = match lookup(map, keys::VERSION) {
            Some(Value::Integer(i)) => u64::try_from(*i)
                .map_err(|_| StoreError::InvalidData("snapshot version out of range".into()))?,
            _ => return Err(StoreError::InvalidData("snapshot: missing version".into())),
        };
        if version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion(version));
        }

        let institutions = array(map, keys::INSTITUTIONS, "institutions")?
            .iter()
            .map(institution_from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let issuers = array(map, keys::ISSUERS, "issuers")?
            .iter()
            .map(issuer_from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let credentials = array(map, keys::CREDENTIALS, "credentials")?
            .iter()
            .map(credential_from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        ensure_ascending(&institutions, |i| &i.id, "institutions")?;
        ensure_ascending(&issuers, |i| &i.institution_id, "issuers")?;
        ensure_ascending(&credentials, |c| &c.hash, "credentials")?;

        Ok(Self {
            institutions,
            issuers,
            credentials,
        })
    }

    /// Blake3 digest of the canonical bytes, hex-encoded.
    pub fn digest(&self) -> Result<String> {
        Ok(record_digest(&self.to_bytes()?))
    }

    /// Save to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Load from a file written by [`Snapshot::write_to`].
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

fn key(k: u64) -> Value {
    Value::Integer(k.into())
}

fn lookup(map: &[(Value, Value)], k: u64) -> Option<&Value> {
    map.iter()
        .find(|(key, _)| matches!(key, Value::Integer(i) if i128::from(*i) == k as i128))
        .map(|(_, v)| v)
}

fn array<'a>(map: &'a [(Value, Value)], k: u64, what: &str) -> Result<&'a [Value]> {
    match lookup(map, k) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(StoreError::InvalidData(format!("snapshot: missing {what}"))),
    }
}

fn ensure_ascending<T, K, F>(items: &[T], key: F, what: &str) -> Result<()>
where
    K: Ord + std::fmt::Display,
    F: Fn(&T) -> &K,
{
    for pair in items.windows(2) {
        let (prev, next) = (key(&pair[0]), key(&pair[1]));
        if prev >= next {
            return Err(StoreError::InvalidData(format!(
                "snapshot: {what} out of order or duplicated at {next}"
            )));
        }
    }
    Ok(())
}
