//! Proptest generators for property-based testing.

use proptest::prelude::*;

use accredit_core::{BlockHeight, CredentialHash, InstitutionId, NewCredential, Principal};

/// Generate an institution id like `"mit-042"`.
pub fn institution_id() -> impl Strategy<Value = InstitutionId> {
    "[a-z]{2,10}-[0-9]{3}".prop_map(InstitutionId::new)
}

/// Generate a hex credential hash.
pub fn credential_hash() -> impl Strategy<Value = CredentialHash> {
    any::<[u8; 16]>().prop_map(|bytes| CredentialHash::new(hex::encode(bytes)))
}

/// Generate a caller principal.
pub fn principal() -> impl Strategy<Value = Principal> {
    "ST[0-9A-Z]{8,38}".prop_map(Principal::new)
}

/// Generate a clock value. Kept well below `u64::MAX` so tests can add
/// offsets without overflow.
pub fn height() -> impl Strategy<Value = BlockHeight> {
    (0u64..=1_000_000).prop_map(BlockHeight::new)
}

/// Generate a credential type.
pub fn credential_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("bachelor".to_string()),
        Just("master".to_string()),
        Just("phd".to_string()),
        Just("certificate".to_string()),
    ]
}

/// Parameters for one issuance.
#[derive(Debug, Clone)]
pub struct IssueParams {
    pub hash: CredentialHash,
    pub institution_id: InstitutionId,
    pub student_id: String,
    pub credential_type: String,
    pub issued_at: BlockHeight,
    pub expires_at: BlockHeight,
    pub metadata: String,
}

impl IssueParams {
    /// The issuance request these parameters describe.
    pub fn request(&self) -> NewCredential {
        NewCredential::new(
            self.hash.clone(),
            self.institution_id.clone(),
            self.student_id.as_str(),
            self.credential_type.clone(),
            self.expires_at.value(),
        )
        .metadata(self.metadata.clone())
    }
}

impl Arbitrary for IssueParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            credential_hash(),
            institution_id(),
            "student-[0-9]{1,6}",
            credential_type(),
            height(),
            height(),
            "[A-Za-z ]{0,40}",
        )
            .prop_map(
                |(hash, institution_id, student_id, credential_type, issued_at, expires_at, metadata)| {
                    IssueParams {
                        hash,
                        institution_id,
                        student_id,
                        credential_type,
                        issued_at,
                        expires_at,
                        metadata,
                    }
                },
            )
            .boxed()
    }
}
