use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::principal::Principal;

/// Failure of the underlying credential storage, not of the credentials.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt principal record: {0}")]
    CorruptRecord(String),
}

/// Single-principal lookup implemented by whatever persists accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Look up a principal by exact username.
    ///
    /// # Returns
    /// `None` when no principal has this username
    ///
    /// # Errors
    /// * `Unavailable` - The backing storage could not be reached
    /// * `CorruptRecord` - A stored record could not be mapped to a principal
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError>;
}

/// Credential store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    principals: HashMap<String, Principal>,
}

impl InMemoryCredentialStore {
    pub fn new<I>(principals: I) -> Self
    where
        I: IntoIterator<Item = Principal>,
    {
        Self {
            principals: principals
                .into_iter()
                .map(|p| (p.username.clone(), p))
                .collect(),
        }
    }

    /// Add or replace the principal with the same username.
    pub fn insert(&mut self, principal: Principal) {
        self.principals.insert(principal.username.clone(), principal);
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        Ok(self.principals.get(username).cloned())
    }
}
