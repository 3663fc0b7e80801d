use auth_core::PasswordError;
use auth_core::StoreError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Top-level error for account provisioning and lookup
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AccountError> for StoreError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidUsername(_) => StoreError::CorruptRecord(err.to_string()),
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}
