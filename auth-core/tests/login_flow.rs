use std::collections::BTreeSet;
use std::sync::Arc;

use auth_core::AuthFailure;
use auth_core::AuthenticationError;
use auth_core::AuthenticationService;
use auth_core::CredentialRequest;
use auth_core::CredentialVerifier;
use auth_core::InMemoryCredentialStore;
use auth_core::ManualClock;
use auth_core::PasswordHasher;
use auth_core::Principal;
use auth_core::RejectionReason;
use auth_core::SigningKey;
use auth_core::TokenCodec;
use auth_core::TokenError;
use auth_core::TokenValidationFilter;
use chrono::DateTime;
use chrono::Duration;

const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

struct Harness {
    clock: Arc<ManualClock>,
    codec: Arc<TokenCodec>,
    login: AuthenticationService<InMemoryCredentialStore>,
    filter: TokenValidationFilter,
}

fn harness() -> Harness {
    let hash = PasswordHasher::new().hash("pw123").expect("Failed to hash secret");
    let store = Arc::new(InMemoryCredentialStore::new([Principal::new(
        "alice",
        hash,
        ["USER"],
    )]));

    let clock = Arc::new(ManualClock::new(
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ));
    let codec = Arc::new(
        TokenCodec::new(SigningKey::new(SECRET).unwrap(), Duration::minutes(30))
            .unwrap()
            .with_clock(clock.clone()),
    );

    let verifier = CredentialVerifier::new(Arc::clone(&store)).unwrap();
    Harness {
        clock,
        codec: Arc::clone(&codec),
        login: AuthenticationService::new(verifier, Arc::clone(&codec)),
        filter: TokenValidationFilter::new(codec),
    }
}

#[tokio::test]
async fn test_alice_scenario() {
    let h = harness();

    let token = h
        .login
        .login(CredentialRequest::new("alice", "pw123"))
        .await
        .expect("Login failed");

    let claims = h.codec.verify(&token).expect("Token rejected");
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.roles, BTreeSet::from(["USER".to_string()]));

    let wrong = h
        .login
        .login(CredentialRequest::new("alice", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(wrong, AuthenticationError::AuthenticationFailed(_)));

    assert!(matches!(
        h.codec.verify("garbage-string"),
        Err(TokenError::Malformed { .. }) | Err(TokenError::BadSignature)
    ));

    h.clock.advance(Duration::minutes(30) + Duration::seconds(1));
    assert_eq!(h.codec.verify(&token), Err(TokenError::Expired));
}

#[tokio::test]
async fn test_login_then_filter() {
    let h = harness();

    let token = h
        .login
        .login(CredentialRequest::new("alice", "pw123"))
        .await
        .unwrap();

    let principal = h
        .filter
        .authorize(Some(&format!("Bearer {}", token)))
        .await
        .expect("Filter rejected a fresh token");

    assert_eq!(principal.username, "alice");
    assert!(auth_core::has_role(&principal, "USER"));
    assert!(!auth_core::has_role(&principal, "ADMIN"));
}

#[tokio::test]
async fn test_unknown_user_and_wrong_secret_share_outcome() {
    let h = harness();

    let unknown = h
        .login
        .login(CredentialRequest::new("nobody", "pw123"))
        .await
        .unwrap_err();
    let wrong = h
        .login
        .login(CredentialRequest::new("alice", "nope"))
        .await
        .unwrap_err();

    assert_eq!(
        std::mem::discriminant(&unknown),
        std::mem::discriminant(&wrong)
    );
    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.failure(), Some(AuthFailure::UnknownPrincipal));
    assert_eq!(wrong.failure(), Some(AuthFailure::InvalidSecret));
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let h = harness();
    let foreign = TokenCodec::new(
        SigningKey::new(b"some-other-deployment-key-32-bytes-long").unwrap(),
        Duration::minutes(30),
    )
    .unwrap();

    let token = foreign.issue("alice", ["ADMIN"]).unwrap();
    let rejected = h
        .filter
        .authorize(Some(&format!("Bearer {}", token)))
        .await
        .unwrap_err();

    assert_eq!(
        rejected.reason,
        RejectionReason::Token(TokenError::BadSignature)
    );
}

#[test]
fn test_round_trip_for_various_role_sets() {
    let h = harness();

    for roles in [vec![], vec!["USER"], vec!["USER", "ADMIN", "STAFF"]] {
        let expected: BTreeSet<String> = roles.iter().map(|r| r.to_string()).collect();
        let token = h.codec.issue("bob", roles).unwrap();
        let claims = h.codec.verify(&token).unwrap();

        assert_eq!(claims.sub, "bob");
        assert_eq!(claims.roles, expected);
    }
}
