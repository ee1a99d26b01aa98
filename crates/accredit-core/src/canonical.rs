//! Canonical CBOR encoding for registry records.
//!
//! Records are encoded as CBOR maps with small integer keys, following
//! RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (heights are u64)
//!
//! The same record always produces identical bytes, so digests over a set of
//! records are stable across hosts.

use ciborium::value::Value;

use crate::credential::Credential;
use crate::error::CoreError;
use crate::institution::{AuthorizedIssuer, Institution};
use crate::types::BlockHeight;

/// Institution field keys.
mod institution_keys {
    pub const ID: u64 = 0;
    pub const NAME: u64 = 1;
    pub const WEBSITE: u64 = 2;
    pub const VERIFIED: u64 = 3;
    pub const VERIFICATION_DATE: u64 = 4;
}

/// Issuer field keys.
mod issuer_keys {
    pub const INSTITUTION_ID: u64 = 0;
    pub const AUTHORIZED: u64 = 1;
}

/// Credential field keys.
mod credential_keys {
    pub const HASH: u64 = 0;
    pub const INSTITUTION_ID: u64 = 1;
    pub const STUDENT_ID: u64 = 2;
    pub const CREDENTIAL_TYPE: u64 = 3;
    pub const ISSUE_DATE: u64 = 4;
    pub const EXPIRATION_DATE: u64 = 5;
    pub const METADATA: u64 = 6;
    pub const REVOKED_AT: u64 = 7;
}

/// Encode an institution to canonical CBOR bytes.
pub fn canonical_institution_bytes(institution: &Institution) -> Result<Vec<u8>, CoreError> {
    encode_canonical(&institution_to_value(institution))
}

/// Encode a credential to canonical CBOR bytes.
pub fn canonical_credential_bytes(credential: &Credential) -> Result<Vec<u8>, CoreError> {
    encode_canonical(&credential_to_value(credential))
}

/// Blake3 digest of canonical bytes, hex-encoded.
pub fn record_digest(canonical: &[u8]) -> String {
    hex::encode(blake3::hash(canonical).as_bytes())
}

/// Convert an institution to a CBOR map.
pub fn institution_to_value(institution: &Institution) -> Value {
    use institution_keys::*;

    Value::Map(vec![
        (key(ID), Value::Text(institution.id.to_string())),
        (key(NAME), Value::Text(institution.name.clone())),
        (key(WEBSITE), Value::Text(institution.website.clone())),
        (key(VERIFIED), Value::Bool(institution.verified)),
        (key(VERIFICATION_DATE), height(institution.verification_date)),
    ])
}

/// Convert an issuer entry to a CBOR map.
pub fn issuer_to_value(issuer: &AuthorizedIssuer) -> Value {
    use issuer_keys::*;

    Value::Map(vec![
        (key(INSTITUTION_ID), Value::Text(issuer.institution_id.to_string())),
        (key(AUTHORIZED), Value::Bool(issuer.authorized)),
    ])
}

/// Convert a credential to a CBOR map.
pub fn credential_to_value(credential: &Credential) -> Value {
    use credential_keys::*;

    let revoked_at = match credential.revoked_at {
        Some(h) => height(h),
        None => Value::Null,
    };

    Value::Map(vec![
        (key(HASH), Value::Text(credential.hash.to_string())),
        (key(INSTITUTION_ID), Value::Text(credential.institution_id.to_string())),
        (key(STUDENT_ID), Value::Text(credential.student_id.to_string())),
        (key(CREDENTIAL_TYPE), Value::Text(credential.credential_type.clone())),
        (key(ISSUE_DATE), height(credential.issue_date)),
        (key(EXPIRATION_DATE), height(credential.expiration_date)),
        (key(METADATA), Value::Text(credential.metadata.clone())),
        (key(REVOKED_AT), revoked_at),
    ])
}

/// Rebuild an institution from a CBOR map.
pub fn institution_from_value(value: &Value) -> Result<Institution, CoreError> {
    use institution_keys::*;

    let map = as_map(value, "institution")?;
    Ok(Institution {
        id: get_text(map, ID, "institution.id")?.into(),
        name: get_text(map, NAME, "institution.name")?,
        website: get_text(map, WEBSITE, "institution.website")?,
        verified: get_bool(map, VERIFIED, "institution.verified")?,
        verification_date: get_height(map, VERIFICATION_DATE, "institution.verification_date")?,
    })
}

/// Rebuild an issuer entry from a CBOR map.
pub fn issuer_from_value(value: &Value) -> Result<AuthorizedIssuer, CoreError> {
    use issuer_keys::*;

    let map = as_map(value, "issuer")?;
    Ok(AuthorizedIssuer {
        institution_id: get_text(map, INSTITUTION_ID, "issuer.institution_id")?.into(),
        authorized: get_bool(map, AUTHORIZED, "issuer.authorized")?,
    })
}

/// Rebuild a credential from a CBOR map.
pub fn credential_from_value(value: &Value) -> Result<Credential, CoreError> {
    use credential_keys::*;

    let map = as_map(value, "credential")?;
    let revoked_at = match get(map, REVOKED_AT) {
        None | Some(Value::Null) => None,
        Some(_) => Some(get_height(map, REVOKED_AT, "credential.revoked_at")?),
    };

    Ok(Credential {
        hash: get_text(map, HASH, "credential.hash")?.into(),
        institution_id: get_text(map, INSTITUTION_ID, "credential.institution_id")?.into(),
        student_id: get_text(map, STUDENT_ID, "credential.student_id")?.into(),
        credential_type: get_text(map, CREDENTIAL_TYPE, "credential.credential_type")?,
        issue_date: get_height(map, ISSUE_DATE, "credential.issue_date")?,
        expiration_date: get_height(map, EXPIRATION_DATE, "credential.expiration_date")?,
        metadata: get_text(map, METADATA, "credential.metadata")?,
        revoked_at,
    })
}

/// Decode an institution from canonical bytes.
pub fn decode_institution(bytes: &[u8]) -> Result<Institution, CoreError> {
    institution_from_value(&decode_value(bytes)?)
}

/// Decode a credential from canonical bytes.
pub fn decode_credential(bytes: &[u8]) -> Result<Credential, CoreError> {
    credential_from_value(&decode_value(bytes)?)
}

/// Parse arbitrary CBOR bytes into a value tree.
pub fn decode_value(bytes: &[u8]) -> Result<Value, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Encode a CBOR value to canonical bytes.
///
/// Floats and tagged values are rejected.
pub fn encode_canonical(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

fn key(k: u64) -> Value {
    Value::Integer(k.into())
}

fn height(h: BlockHeight) -> Value {
    Value::Integer(h.value().into())
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Array(arr) => {
            encode_uint(buf, 4, arr.len() as u64);
            for item in arr {
                encode_value_to(buf, item)?;
            }
        }
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::EncodingError(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => {
            return Err(CoreError::EncodingError(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map with keys sorted by their encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}

fn as_map<'a>(value: &'a Value, what: &str) -> Result<&'a [(Value, Value)], CoreError> {
    match value {
        Value::Map(m) => Ok(m),
        _ => Err(CoreError::MalformedRecord(format!("{what}: expected map"))),
    }
}

fn get(map: &[(Value, Value)], k: u64) -> Option<&Value> {
    map.iter()
        .find(|(key, _)| matches!(key, Value::Integer(i) if i128::from(*i) == k as i128))
        .map(|(_, v)| v)
}

fn get_text(map: &[(Value, Value)], k: u64, field: &str) -> Result<String, CoreError> {
    match get(map, k) {
        Some(Value::Text(s)) => Ok(s.clone()),
        _ => Err(CoreError::MalformedRecord(format!("missing or invalid {field}"))),
    }
}

fn get_bool(map: &[(Value, Value)], k: u64, field: &str) -> Result<bool, CoreError> {
    match get(map, k) {
        Some(Value::Bool(b)) => Ok(*b),
        _ => Err(CoreError::MalformedRecord(format!("missing or invalid {field}"))),
    }
}

fn get_height(map: &[(Value, Value)], k: u64, field: &str) -> Result<BlockHeight, CoreError> {
    match get(map, k) {
        Some(Value::Integer(i)) => u64::try_from(*i)
            .map(BlockHeight::new)
            .map_err(|_| CoreError::MalformedRecord(format!("{field} out of range"))),
        _ => Err(CoreError::MalformedRecord(format!("missing or invalid {field}"))),
    }
}
