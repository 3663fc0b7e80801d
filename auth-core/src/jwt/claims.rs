use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token payload.
///
/// Field order is fixed and roles are an ordered set, so the same claims
/// always serialize to the same bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal username)
    pub sub: String,

    /// Role claims granted to the subject
    #[serde(default)]
    pub roles: BTreeSet<String>,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` issued at `issued_at` and valid for `ttl`.
    ///
    /// Timestamps are truncated to whole seconds.
    pub fn new(
        subject: impl Into<String>,
        roles: BTreeSet<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.into(),
            roles,
            iat,
            exp: iat.saturating_add(ttl.num_seconds()),
        }
    }

    /// A token stays valid up to and including the instant `exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
