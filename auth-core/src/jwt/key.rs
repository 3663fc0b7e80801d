use std::fmt;

use super::errors::CodecConfigError;

/// Process-wide HMAC secret used to sign and verify tokens.
///
/// Loaded once at startup and moved into the [`TokenCodec`](super::TokenCodec).
/// `Debug` is redacted so the key cannot leak through logs.
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// HS256 wants at least 256 bits of key material.
    pub const MIN_LENGTH: usize = 32;

    /// Wrap raw key material.
    ///
    /// # Errors
    /// * `MissingKey` - The secret is empty
    /// * `KeyTooShort` - Fewer than 32 bytes
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, CodecConfigError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CodecConfigError::MissingKey);
        }
        if secret.len() < Self::MIN_LENGTH {
            return Err(CodecConfigError::KeyTooShort {
                min: Self::MIN_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(Self(secret.to_vec()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
