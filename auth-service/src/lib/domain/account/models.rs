use std::collections::BTreeSet;
use std::fmt;

use auth_core::Principal;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::UsernameError;

/// Provisioned account: the persisted form of a principal.
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub password_hash: String,
    pub roles: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl From<Account> for Principal {
    fn from(account: Account) -> Self {
        Principal {
            username: account.username.as_str().to_string(),
            secret_hash: account.password_hash,
            roles: account.roles,
        }
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to provision a new account.
pub struct RegisterAccountCommand {
    pub username: Username,
    pub password: String,
}

impl RegisterAccountCommand {
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    pub fn new(username: Username, password: String) -> Result<Self, AccountError> {
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        Ok(Self { username, password })
    }
}

impl fmt::Debug for RegisterAccountCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterAccountCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
