use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::principal::AuthenticatedPrincipal;
use crate::store::CredentialStore;
use crate::store::StoreError;

const BEARER_PREFIX: &str = "Bearer ";

/// Progress of a single request through token validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Unauthenticated,
    TokenPresent,
    SignatureChecked,
    ExpiryChecked,
    Authenticated,
}

/// Detailed reason a request was rejected. For logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("No bearer token presented")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Token subject no longer exists")]
    UnknownPrincipal,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RejectionReason {
    /// Last stage the request reached before being rejected.
    pub fn stage(&self) -> ValidationStage {
        match self {
            RejectionReason::MissingToken => ValidationStage::Unauthenticated,
            RejectionReason::Token(TokenError::Expired)
            | RejectionReason::Token(TokenError::Malformed {
                signature_verified: true,
                ..
            }) => ValidationStage::SignatureChecked,
            RejectionReason::Token(_) => ValidationStage::TokenPresent,
            RejectionReason::UnknownPrincipal | RejectionReason::Store(_) => {
                ValidationStage::ExpiryChecked
            }
        }
    }
}

/// A request refused by the [`TokenValidationFilter`].
///
/// `Display` is the uniform client-facing text; the reason is for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unauthorized")]
pub struct Rejected {
    pub reason: RejectionReason,
}

impl Rejected {
    pub fn stage(&self) -> ValidationStage {
        self.reason.stage()
    }
}

impl From<RejectionReason> for Rejected {
    fn from(reason: RejectionReason) -> Self {
        Self { reason }
    }
}

impl From<TokenError> for Rejected {
    fn from(err: TokenError) -> Self {
        RejectionReason::from(err).into()
    }
}

impl From<StoreError> for Rejected {
    fn from(err: StoreError) -> Self {
        RejectionReason::from(err).into()
    }
}

/// Gate in front of every protected operation.
///
/// Built with only a codec, the filter trusts the token's claims. Built
/// with a store, it also requires the subject to still exist and takes the
/// roles from the store.
pub struct TokenValidationFilter {
    codec: Arc<TokenCodec>,
    store: Option<Arc<dyn CredentialStore>>,
}

impl TokenValidationFilter {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec, store: None }
    }

    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate the raw credential field of a request.
    ///
    /// # Arguments
    /// * `credential` - Value of the `Authorization` header, if any
    ///
    /// # Returns
    /// The authenticated principal to attach to the request
    ///
    /// # Errors
    /// `Rejected` with the reason and the stage it happened at
    pub async fn authorize(
        &self,
        credential: Option<&str>,
    ) -> Result<AuthenticatedPrincipal, Rejected> {
        let token = bearer_token(credential).ok_or(RejectionReason::MissingToken)?;

        let claims = self.codec.verify(token)?;

        let Some(store) = &self.store else {
            return Ok(AuthenticatedPrincipal {
                username: claims.sub,
                roles: claims.roles,
            });
        };

        let principal = store
            .find_by_username(&claims.sub)
            .await?
            .ok_or(RejectionReason::UnknownPrincipal)?;

        Ok(AuthenticatedPrincipal {
            username: principal.username,
            roles: principal.roles,
        })
    }
}

impl fmt::Debug for TokenValidationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidationFilter")
            .field("codec", &self.codec)
            .field("checks_store", &self.store.is_some())
            .finish()
    }
}

/// Extract the token from `Bearer <token>`. Other schemes count as absent.
pub fn bearer_token(credential: Option<&str>) -> Option<&str> {
    credential?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
