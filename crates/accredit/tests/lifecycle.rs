//! End-to-end lifecycle scenarios across both registry components.

use accredit::{
    Accredit, BlockHeight, CredentialStatus, ErrorKind, NewCredential, RegistryConfig,
    RegistryError, Snapshot,
};
use accredit_testkit::{init_tracing, TestFixture, CONTROLLER};

#[test]
fn register_authorize_issue_verify() {
    init_tracing();
    let fx = TestFixture::new();

    fx.register("mit-001", 100).unwrap();
    fx.authorize("mit-001", 100).unwrap();
    fx.registry
        .credentials()
        .issue_credential(
            &fx.controller_at(100),
            NewCredential::new("h1", "mit-001", "student-123", "bachelor", 200)
                .metadata("Computer Science Degree"),
        )
        .unwrap();

    let result = fx.verify("h1", 100).unwrap();
    assert!(result.valid);
    assert_eq!(result.credential.credential_type, "bachelor");
    assert_eq!(result.credential.issue_date, BlockHeight::new(100));
}

#[test]
fn credential_expired_at_issuance() {
    init_tracing();
    let fx = TestFixture::new();

    fx.authorize("yale-001", 100).unwrap();
    fx.issue("h2", "yale-001", 100, 50).unwrap();

    let result = fx.verify("h2", 100).unwrap();
    assert!(!result.valid);
    assert_eq!(
        fx.registry
            .credentials()
            .credential_status(&fx.controller_at(100), "h2")
            .unwrap(),
        CredentialStatus::Expired
    );
}

#[test]
fn revoke_then_verify() {
    init_tracing();
    let fx = TestFixture::new();

    fx.authorize("columbia-001", 100).unwrap();
    fx.issue("columbia-credential-123", "columbia-001", 100, 300)
        .unwrap();
    fx.revoke("columbia-credential-123", 140).unwrap();

    let result = fx.verify("columbia-credential-123", 140).unwrap();
    assert!(!result.valid);
    assert_eq!(result.credential.expiration_date, BlockHeight::new(140));
    assert_eq!(result.credential.revoked_at, Some(BlockHeight::new(140)));
}

#[test]
fn second_revocation_keeps_credential_invalid() {
    let fx = TestFixture::new();

    fx.authorize("mit-001", 100).unwrap();
    fx.issue("h1", "mit-001", 100, 300).unwrap();
    fx.revoke("h1", 120).unwrap();
    fx.revoke("h1", 180).unwrap();

    let result = fx.verify("h1", 180).unwrap();
    assert!(!result.valid);
    assert_eq!(result.credential.expiration_date, BlockHeight::new(180));
    assert_eq!(result.credential.revoked_at, Some(BlockHeight::new(120)));
    assert!(!fx.verify("h1", 250).unwrap().valid);
}

#[test]
fn validity_flips_with_clock_alone() {
    let fx = TestFixture::new();

    fx.authorize("mit-001", 100).unwrap();
    fx.issue("h1", "mit-001", 100, 150).unwrap();

    assert!(fx.verify("h1", 149).unwrap().valid);
    assert!(!fx.verify("h1", 150).unwrap().valid);
}

#[test]
fn verified_institution_still_needs_authorization() {
    let fx = TestFixture::new();

    fx.register_and_verify("stanford-001", 100).unwrap();
    assert!(fx
        .registry
        .institutions()
        .is_institution_verified("stanford-001")
        .unwrap());

    let err = fx.issue("h1", "stanford-001", 100, 200).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(err.code(), 403);
}

#[test]
fn registered_but_unverified_institution() {
    let fx = TestFixture::new();

    fx.register("harvard-001", 100).unwrap();
    assert!(!fx
        .registry
        .institutions()
        .is_institution_verified("harvard-001")
        .unwrap());

    let details = fx
        .registry
        .institutions()
        .get_institution_details("harvard-001")
        .unwrap()
        .unwrap();
    assert_eq!(details.verification_date, BlockHeight::ZERO);
}

#[test]
fn privileged_calls_reject_non_controller() {
    let fx = TestFixture::new();
    fx.register("mit-001", 100).unwrap();
    fx.authorize("mit-001", 100).unwrap();
    fx.issue("h1", "mit-001", 100, 300).unwrap();

    let outsider = fx.caller_at("ST2OUTSIDER", 110);
    let institutions = fx.registry.institutions();
    let credentials = fx.registry.credentials();

    let errors = vec![
        institutions.verify_institution(&outsider, "mit-001").unwrap_err(),
        credentials.authorize_institution(&outsider, "mit-001").unwrap_err(),
        credentials.deauthorize_institution(&outsider, "mit-001").unwrap_err(),
        credentials.revoke_credential(&outsider, "h1").unwrap_err(),
    ];
    for err in errors {
        assert!(matches!(err, RegistryError::Forbidden { .. }), "{err}");
    }

    // nothing changed
    assert!(!institutions.is_institution_verified("mit-001").unwrap());
    assert!(credentials.is_institution_authorized("mit-001").unwrap());
    assert!(fx.verify("h1", 110).unwrap().valid);
}

#[test]
fn repeated_failure_is_stable() {
    let fx = TestFixture::new();

    for height in [0, 100, 10_000] {
        let err = fx
            .registry
            .institutions()
            .verify_institution(&fx.controller_at(height), "nonexistent-001")
            .unwrap_err();
        assert_eq!(err.code(), 404);
    }
}

#[test]
fn strict_policy_rejects_duplicates() {
    let fx = TestFixture::strict();

    fx.register("mit-001", 100).unwrap();
    let err = fx.register("mit-001", 101).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    fx.authorize("mit-001", 100).unwrap();
    fx.issue("h1", "mit-001", 100, 200).unwrap();
    let err = fx.issue("h1", "mit-001", 101, 900).unwrap_err();
    assert_eq!(err.code(), 409);
    assert_eq!(
        fx.verify("h1", 101).unwrap().credential.expiration_date,
        BlockHeight::new(200)
    );
}

#[test]
fn snapshot_survives_host_restart() {
    let fx = TestFixture::new();
    fx.register_and_verify("mit-001", 90).unwrap();
    fx.authorize("mit-001", 95).unwrap();
    fx.issue("h1", "mit-001", 100, 300).unwrap();
    fx.issue("h2", "mit-001", 100, 300).unwrap();
    fx.revoke("h2", 150).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.cbor");
    fx.registry.snapshot().unwrap().write_to(&path).unwrap();

    let restored = Accredit::restore(
        &Snapshot::read_from(&path).unwrap(),
        RegistryConfig::new(CONTROLLER),
    );
    let ctx = fx.controller_at(200);

    assert_eq!(restored.state_root().unwrap(), fx.registry.state_root().unwrap());
    assert!(restored.institutions().is_institution_verified("mit-001").unwrap());
    assert!(restored.credentials().verify_credential(&ctx, "h1").unwrap().valid);
    assert_eq!(
        restored.credentials().credential_status(&ctx, "h2").unwrap(),
        CredentialStatus::Revoked
    );
}
