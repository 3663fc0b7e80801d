use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Salted, adaptive one-way hashing of principal secrets (Argon2id).
///
/// Hashes are PHC strings, so algorithm, parameters and salt travel with
/// the hash and verification needs nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret with a freshly generated salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored PHC hash.
    ///
    /// The digest comparison inside `argon2` is constant time.
    ///
    /// # Returns
    /// `true` when the secret matches
    ///
    /// # Errors
    /// * `InvalidHash` - The stored hash cannot be parsed
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
