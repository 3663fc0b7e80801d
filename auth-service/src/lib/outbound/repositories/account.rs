use async_trait::async_trait;
use auth_core::CredentialStore;
use auth_core::Principal;
use auth_core::StoreError;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    password_hash: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Login projection. Usernames are taken as stored, without `Username` rules.
#[derive(FromRow)]
struct CredentialRow {
    username: String,
    password_hash: String,
    roles: Vec<String>,
}

impl From<CredentialRow> for Principal {
    fn from(row: CredentialRow) -> Self {
        Principal::new(row.username, row.password_hash, row.roles)
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            roles: row.roles.into_iter().collect(),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let roles: Vec<String> = account.roles.iter().cloned().collect();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, roles, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(&account.password_hash)
        .bind(roles)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("accounts_username_key")
                {
                    return AccountError::UsernameAlreadyExists(
                        account.username.as_str().to_string(),
                    );
                }
            }
            AccountError::DatabaseError(e.to_string())
        })?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, roles, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl CredentialStore for PostgresAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT username, password_hash, roles
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(row.map(Principal::from))
    }
}
