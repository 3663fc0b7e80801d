use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::CodecConfigError;
use super::errors::TokenError;
use super::key::SigningKey;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Issues and verifies signed, time-bounded access tokens.
///
/// Tokens are HS256 JWTs signed with a single process-wide [`SigningKey`].
/// HMAC signing is deterministic: the same claims always produce the same
/// token string. Expiry is checked against the codec's [`Clock`], not by
/// `jsonwebtoken`, so tests can drive time explicitly.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub const DEFAULT_TTL_MINUTES: i64 = 30;
    pub const MAX_TTL_DAYS: i64 = 365;

    /// Create a codec using the system clock.
    ///
    /// # Arguments
    /// * `key` - Signing key (consumed; the codec is its only holder)
    /// * `ttl` - Validity window applied to every issued token
    ///
    /// # Errors
    /// * `NonPositiveTtl` - `ttl` is zero or negative
    /// * `TtlOutOfRange` - `ttl` is longer than [`Self::MAX_TTL_DAYS`]
    pub fn new(key: SigningKey, ttl: Duration) -> Result<Self, CodecConfigError> {
        if ttl <= Duration::zero() {
            return Err(CodecConfigError::NonPositiveTtl(ttl.num_seconds()));
        }
        if ttl > Duration::days(Self::MAX_TTL_DAYS) {
            return Err(CodecConfigError::TtlOutOfRange {
                max_days: Self::MAX_TTL_DAYS,
            });
        }

        let algorithm = Algorithm::HS256;
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            algorithm,
            validation,
            ttl,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `subject` carrying `roles`.
    ///
    /// # Returns
    /// Encoded token string (`header.payload.signature`)
    ///
    /// # Errors
    /// * `EncodingFailed` - Empty subject, or signing failed
    pub fn issue<I, R>(&self, subject: &str, roles: I) -> Result<String, TokenError>
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        if subject.is_empty() {
            return Err(TokenError::EncodingFailed("subject is empty".to_string()));
        }

        let roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        let claims = Claims::new(subject, roles, self.clock.now(), self.ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, then return the embedded claims.
    ///
    /// Signature is checked before the payload is decoded, so any change to
    /// the payload bytes surfaces as `BadSignature`.
    ///
    /// # Errors
    /// * `BadSignature` - Signature mismatch or unexpected algorithm
    /// * `Malformed` - Not a decodable token, or required claims missing/empty
    /// * `Expired` - Current time is past `exp`
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?
            .claims;

        if claims.sub.is_empty() {
            return Err(TokenError::invalid_claims("subject is empty"));
        }

        if claims.is_expired(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

fn classify(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        // Required claims are validated only once the signature has passed
        ErrorKind::MissingRequiredClaim(_) => TokenError::invalid_claims(error.to_string()),
        _ => TokenError::malformed(error.to_string()),
    }
}
