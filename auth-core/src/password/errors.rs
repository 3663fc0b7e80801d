use thiserror::Error;

/// Error type for secret hashing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored secret hash is not a valid PHC string: {0}")]
    InvalidHash(String),
}
