use std::sync::Arc;

use chrono::Duration;

use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::principal::CredentialRequest;
use crate::store::CredentialStore;
use crate::store::StoreError;
use crate::verifier::AuthFailure;
use crate::verifier::CredentialVerifier;
use crate::verifier::VerificationError;

/// Outcome of a failed login.
///
/// `AuthenticationFailed` displays the same text whichever check failed. The
/// precise [`AuthFailure`] is kept for logs via [`AuthenticationError::failure`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Authentication failed")]
    AuthenticationFailed(AuthFailure),

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl AuthenticationError {
    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthenticationError::AuthenticationFailed(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<VerificationError> for AuthenticationError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Rejected(reason) => AuthenticationError::AuthenticationFailed(reason),
            VerificationError::Store(e) => AuthenticationError::Store(e),
            VerificationError::Password(e) => AuthenticationError::Password(e),
        }
    }
}

/// Turns a login request into an access token.
///
/// Stateless: nothing is retained between calls.
pub struct AuthenticationService<S>
where
    S: CredentialStore,
{
    verifier: CredentialVerifier<S>,
    codec: Arc<TokenCodec>,
}

impl<S> AuthenticationService<S>
where
    S: CredentialStore,
{
    pub fn new(verifier: CredentialVerifier<S>, codec: Arc<TokenCodec>) -> Self {
        Self { verifier, codec }
    }

    /// Validity window of the tokens this service issues.
    pub fn token_ttl(&self) -> Duration {
        self.codec.ttl()
    }

    /// Verify credentials and issue a token for the principal.
    ///
    /// # Returns
    /// Encoded access token
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown username or wrong secret
    /// * `Store` / `Password` / `Token` - Infrastructure failure
    pub async fn login(&self, request: CredentialRequest) -> Result<String, AuthenticationError> {
        let principal = match self
            .verifier
            .verify(&request.username, &request.secret)
            .await
        {
            Ok(principal) => principal,
            Err(e) => {
                let err = AuthenticationError::from(e);
                match err.failure() {
                    Some(reason) => tracing::warn!(
                        username = %request.username,
                        reason = %reason,
                        "Login rejected"
                    ),
                    None => tracing::error!(
                        username = %request.username,
                        error = %err,
                        "Login could not be processed"
                    ),
                }
                return Err(err);
            }
        };

        let token = self
            .codec
            .issue(&principal.username, principal.roles.iter().cloned())?;

        tracing::info!(username = %principal.username, "Access token issued");

        Ok(token)
    }
}
