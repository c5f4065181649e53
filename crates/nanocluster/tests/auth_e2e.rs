// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Sign/verify life cycle of call credentials, driven through a manual clock.

#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]

use nanocluster::auth::{
    AuthCredential, AuthError, CredentialVerifier, ManualClock, StaticCredentialStore,
    UsernamePasswordAuth,
};
use nanocluster::Value;
use std::sync::Arc;
use std::time::Duration;

const NOW: u64 = 1_700_000_000_000;
const CALL_BUF: &[u8] = b"\x01\x02encoded-call";

fn setup() -> (Arc<ManualClock>, UsernamePasswordAuth, CredentialVerifier) {
    let clock = Arc::new(ManualClock::new(NOW));
    let signer = UsernamePasswordAuth::new("alice", "correct horse").with_clock(clock.clone());
    let verifier = CredentialVerifier::new(
        StaticCredentialStore::new().with_user("alice", "correct horse"),
    )
    .with_clock(clock.clone());
    (clock, signer, verifier)
}

#[tokio::test]
async fn fresh_credential_verifies() {
    let (_clock, signer, verifier) = setup();
    let credential = signer.sign("abc", CALL_BUF).unwrap();

    let verified = verifier
        .verify("abc", CALL_BUF, &credential.to_value())
        .await
        .unwrap();
    assert_eq!(verified.username, "alice");
    assert_eq!(verified.valid_until, (NOW + 15_000) as f64);
}

#[tokio::test]
async fn credential_expires() {
    let (clock, signer, verifier) = setup();
    let auth = signer.sign("abc", CALL_BUF).unwrap().to_value();

    clock.advance(Duration::from_millis(15_001));
    let err = verifier.verify("abc", CALL_BUF, &auth).await.unwrap_err();
    assert!(matches!(err, AuthError::Expired { .. }));
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn tampered_signature_byte_fails() {
    let (_clock, signer, verifier) = setup();
    let mut credential = signer.sign("abc", CALL_BUF).unwrap();
    credential.sig[7] ^= 0x01;

    let err = verifier
        .verify("abc", CALL_BUF, &credential.to_value())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::SignatureMismatch);
}

#[tokio::test]
async fn far_future_credential_fails_before_expiry() {
    let (_clock, signer, verifier) = setup();
    let mut credential = signer.sign("abc", CALL_BUF).unwrap();
    credential.valid_until = (NOW + 25_000) as f64;

    let err = verifier
        .verify("abc", CALL_BUF, &credential.to_value())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TooFarInFuture { .. }));
}

#[tokio::test]
async fn credential_is_bound_to_its_call() {
    let (_clock, signer, verifier) = setup();
    let auth = signer.sign("abc", CALL_BUF).unwrap().to_value();

    assert_eq!(
        verifier.verify("abd", CALL_BUF, &auth).await,
        Err(AuthError::SignatureMismatch)
    );
    assert_eq!(
        verifier.verify("abc", b"other payload", &auth).await,
        Err(AuthError::SignatureMismatch)
    );
}

#[tokio::test]
async fn forged_credential_for_unknown_user_fails() {
    let (_clock, _signer, verifier) = setup();
    let forged = AuthCredential {
        username: "mallory".to_string(),
        valid_until: (NOW + 1_000) as f64,
        sig: vec![0; 32],
    };

    let err = verifier
        .verify("abc", CALL_BUF, &forged.to_value())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::UnknownUser("mallory".to_string()));
}

#[tokio::test]
async fn missing_credential_is_malformed() {
    let (_clock, _signer, verifier) = setup();
    let err = verifier
        .verify("abc", CALL_BUF, &Value::Undefined)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Malformed(_)));
}
