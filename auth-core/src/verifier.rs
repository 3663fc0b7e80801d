use std::sync::Arc;

use thiserror::Error;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::principal::Principal;
use crate::store::CredentialStore;
use crate::store::StoreError;

/// Credential rejection. Callers outside the core only see that the attempt failed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("No principal with this username")]
    UnknownPrincipal,

    #[error("Secret does not match")]
    InvalidSecret,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error(transparent)]
    Rejected(#[from] AuthFailure),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Authenticates a username/secret pair against a [`CredentialStore`].
///
/// An unknown username still pays for one full Argon2 verification against a
/// placeholder hash, so it costs about as much as a wrong secret.
pub struct CredentialVerifier<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    hasher: PasswordHasher,
    placeholder_hash: String,
}

impl<S> CredentialVerifier<S>
where
    S: CredentialStore,
{
    /// # Errors
    /// * `HashingFailed` - The placeholder hash could not be computed
    pub fn new(store: Arc<S>) -> Result<Self, PasswordError> {
        let hasher = PasswordHasher::new();
        let placeholder_hash = hasher.hash("placeholder-secret-for-unknown-principals")?;

        Ok(Self {
            store,
            hasher,
            placeholder_hash,
        })
    }

    /// Check `secret` against the stored hash of `username`.
    ///
    /// # Returns
    /// The matching principal
    ///
    /// # Errors
    /// * `Rejected(UnknownPrincipal)` - No such username
    /// * `Rejected(InvalidSecret)` - Secret does not match
    /// * `Store` - Lookup failed
    /// * `Password` - Stored hash is unreadable
    pub async fn verify(&self, username: &str, secret: &str) -> Result<Principal, VerificationError> {
        let Some(principal) = self.store.find_by_username(username).await? else {
            let _ = self.hasher.verify(secret, &self.placeholder_hash);
            return Err(AuthFailure::UnknownPrincipal.into());
        };

        if self.hasher.verify(secret, &principal.secret_hash)? {
            Ok(principal)
        } else {
            Err(AuthFailure::InvalidSecret.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError>;
        }
    }

    fn alice() -> Principal {
        let hash = PasswordHasher::new().hash("pw123").unwrap();
        Principal::new("alice", hash, ["USER"])
    }

    #[tokio::test]
    async fn test_verify_success() {
        let mut store = MockTestCredentialStore::new();
        let principal = alice();
        store
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));

        let verifier = CredentialVerifier::new(Arc::new(store)).unwrap();

        let result = verifier.verify("alice", "pw123").await.unwrap();
        assert_eq!(result.username, "alice");
        assert!(result.roles.contains("USER"));
    }

    #[tokio::test]
    async fn test_verify_wrong_secret() {
        let mut store = MockTestCredentialStore::new();
        let principal = alice();
        store
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));

        let verifier = CredentialVerifier::new(Arc::new(store)).unwrap();

        let result = verifier.verify("alice", "wrong").await;
        assert_eq!(
            result.unwrap_err(),
            VerificationError::Rejected(AuthFailure::InvalidSecret)
        );
    }

    #[tokio::test]
    async fn test_verify_unknown_principal() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let verifier = CredentialVerifier::new(Arc::new(store)).unwrap();

        let result = verifier.verify("mallory", "pw123").await;
        assert_eq!(
            result.unwrap_err(),
            VerificationError::Rejected(AuthFailure::UnknownPrincipal)
        );
    }

    #[tokio::test]
    async fn test_verify_store_failure() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let verifier = CredentialVerifier::new(Arc::new(store)).unwrap();

        let result = verifier.verify("alice", "pw123").await;
        assert!(matches!(result, Err(VerificationError::Store(_))));
    }

    #[tokio::test]
    async fn test_verify_corrupt_hash() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(Principal::new("alice", "plaintext?", ["USER"]))));

        let verifier = CredentialVerifier::new(Arc::new(store)).unwrap();

        let result = verifier.verify("alice", "plaintext?").await;
        assert!(matches!(
            result,
            Err(VerificationError::Password(PasswordError::InvalidHash(_)))
        ));
    }
}
