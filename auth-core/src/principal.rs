use std::collections::BTreeSet;
use std::fmt;

/// Stored identity record as returned by a [`CredentialStore`](crate::CredentialStore).
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    /// Argon2 PHC string
    pub secret_hash: String,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, R>(username: impl Into<String>, secret_hash: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            username: username.into(),
            secret_hash: secret_hash.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("secret_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Username and plaintext secret submitted at login. Never stored.
#[derive(Clone)]
pub struct CredentialRequest {
    pub username: String,
    pub secret: String,
}

impl CredentialRequest {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Caller identity established from a validated token, valid for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub username: String,
    pub roles: BTreeSet<String>,
}

impl AuthenticatedPrincipal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Coarse-grained role check used for endpoint gating.
pub fn has_role(principal: &AuthenticatedPrincipal, role: &str) -> bool {
    principal.has_role(role)
}
