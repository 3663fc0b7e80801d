use async_trait::async_trait;
use auth_core::CredentialStore;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::models::Username;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Provision a new account with the default role.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError>;

    /// Retrieve an account by username.
    ///
    /// # Errors
    /// * `NotFound` - No account with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_account(&self, username: &Username) -> Result<Account, AccountError>;
}

/// Persistence operations for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve an account by exact username.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError>;
}

/// Storage that serves both account provisioning and credential lookup.
pub trait AccountStore: AccountRepository + CredentialStore {}

impl<T> AccountStore for T where T: AccountRepository + CredentialStore {}
