//! Strong type definitions for Accredit.
//!
//! All identifiers are newtypes to prevent misuse at compile time: an
//! institution id cannot be passed where a credential hash is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque, caller-assigned string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw string.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwrap into the raw string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of an institution, assigned by the caller at registration.
    InstitutionId
}

string_id! {
    /// Identifier of a credential record.
    ///
    /// Expected to be a content hash of the underlying credential document.
    /// The registry treats it as opaque and never checks that binding.
    CredentialHash
}

string_id! {
    /// Identifier of the credential holder.
    StudentId
}

string_id! {
    /// An opaque caller identity (account address, service token, ...).
    Principal
}

impl CredentialHash {
    /// Derive a hash from a credential document (Blake3, hex-encoded).
    ///
    /// Convenience for hosts that do not already carry a document hash.
    pub fn of_document(document: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(document).as_bytes()))
    }
}

/// A host-supplied clock value: block height or logical timestamp.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Height zero. Also the "never" marker for `verification_date`.
    pub const ZERO: Self = Self(0);

    /// Create a height from a raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHeight({})", self.0)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_display_and_debug() {
        let id = InstitutionId::from("mit-001");
        assert_eq!(id.to_string(), "mit-001");
        assert_eq!(format!("{:?}", id), "InstitutionId(\"mit-001\")");
    }

    #[test]
    fn test_string_id_serializes_transparently() {
        let hash = CredentialHash::new("abcdef1234567890");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"abcdef1234567890\"");
    }

    #[test]
    fn test_document_hash_is_deterministic() {
        let a = CredentialHash::of_document(b"BSc Computer Science");
        let b = CredentialHash::of_document(b"BSc Computer Science");
        let c = CredentialHash::of_document(b"BSc Physics");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_block_height_ordering() {
        assert!(BlockHeight::new(50) < BlockHeight::new(100));
        assert_eq!(BlockHeight::default(), BlockHeight::ZERO);
        assert_eq!(BlockHeight::from(7).value(), 7);
    }
}
