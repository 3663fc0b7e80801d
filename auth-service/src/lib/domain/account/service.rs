use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use auth_core::PasswordHasher;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;

/// Domain service implementation for account provisioning.
pub struct AccountService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
    default_role: String,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `default_role` - Role granted to every newly registered account
    pub fn new(repository: Arc<R>, default_role: impl Into<String>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            default_role: default_role.into(),
        }
    }
}

#[async_trait]
impl<R> AccountServicePort for AccountService<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            password_hash,
            roles: BTreeSet::from([self.default_role.clone()]),
            created_at: Utc::now(),
        };

        let created = self.repository.create(account).await?;

        tracing::info!(
            account_id = %created.id,
            username = %created.username,
            "Account registered"
        );

        Ok(created)
    }

    async fn get_account(&self, username: &Username) -> Result<Account, AccountError> {
        self.repository
            .find_by_username(username.as_str())
            .await?
            .ok_or(AccountError::NotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, account: Account) -> Result<Account, AccountError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError>;
        }
    }

    fn command(username: &str, password: &str) -> RegisterAccountCommand {
        RegisterAccountCommand::new(
            Username::new(username.to_string()).unwrap(),
            password.to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_create()
            .withf(|account| {
                account.username.as_str() == "alice"
                    && account.password_hash.starts_with("$argon2")
                    && account.roles == BTreeSet::from(["USER".to_string()])
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(repository), "USER");

        let account = service.register(command("alice", "pw123")).await.unwrap();
        assert_eq!(account.username.as_str(), "alice");
        assert_ne!(account.password_hash, "pw123");
        assert!(PasswordHasher::new()
            .verify("pw123", &account.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_create().times(1).returning(|account| {
            Err(AccountError::UsernameAlreadyExists(
                account.username.as_str().to_string(),
            ))
        });

        let service = AccountService::new(Arc::new(repository), "USER");

        let result = service.register(command("alice", "pw123")).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_account_success() {
        let mut repository = MockTestAccountRepository::new();

        let expected = Account {
            id: AccountId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            roles: BTreeSet::from(["USER".to_string()]),
            created_at: Utc::now(),
        };
        let returned = expected.clone();
        repository
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = AccountService::new(Arc::new(repository), "USER");

        let account = service
            .get_account(&Username::new("alice".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(account.id, expected.id);
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repository), "USER");

        let result = service
            .get_account(&Username::new("nobody".to_string()).unwrap())
            .await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }
}
