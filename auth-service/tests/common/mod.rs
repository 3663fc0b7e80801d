use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth_core::AuthenticationService;
use auth_core::CredentialStore;
use auth_core::CredentialVerifier;
use auth_core::ManualClock;
use auth_core::PasswordHasher;
use auth_core::Principal;
use auth_core::SigningKey;
use auth_core::StoreError;
use auth_core::TokenCodec;
use auth_core::TokenValidationFilter;
use auth_service::account::errors::AccountError;
use auth_service::account::models::Account;
use auth_service::account::models::AccountId;
use auth_service::account::models::Username;
use auth_service::account::ports::AccountRepository;
use auth_service::account::service::AccountService;
use auth_service::inbound::http::router::create_router;
use axum::body::Body;
use axum::http::header;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_ROLE: &str = "ADMIN";
pub const DEFAULT_ROLE: &str = "USER";

/// Account repository kept in process memory
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, Account>>,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.lock().unwrap();
        let username = account.username.as_str().to_string();
        if accounts.contains_key(&username) {
            return Err(AccountError::UsernameAlreadyExists(username));
        }
        accounts.insert(username, account.clone());
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.lock().unwrap().get(username).cloned())
    }
}

#[async_trait]
impl CredentialStore for InMemoryAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        let account = AccountRepository::find_by_username(self, username).await?;
        Ok(account.map(Principal::from))
    }
}

/// Router wired to an in-memory repository and a frozen clock
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryAccountRepository>,
    pub clock: Arc<ManualClock>,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let codec = Arc::new(
            TokenCodec::new(SigningKey::new(TEST_SECRET).unwrap(), Duration::minutes(30))
                .unwrap()
                .with_clock(clock.clone()),
        );
        let repository = Arc::new(InMemoryAccountRepository::default());

        let authentication = Arc::new(AuthenticationService::new(
            CredentialVerifier::new(Arc::clone(&repository)).unwrap(),
            Arc::clone(&codec),
        ));
        let token_filter = Arc::new(
            TokenValidationFilter::new(Arc::clone(&codec)).with_store(repository.clone()),
        );
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            DEFAULT_ROLE,
        ));

        let router = create_router(account_service, authentication, token_filter, ADMIN_ROLE);

        Self {
            router,
            repository,
            clock,
            codec,
        }
    }

    /// Insert an account directly, bypassing registration rules on roles
    pub async fn seed_account(&self, username: &str, password: &str, roles: &[&str]) {
        let account = Account {
            id: AccountId::new(),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            roles: roles.iter().map(|r| r.to_string()).collect::<BTreeSet<_>>(),
            created_at: Utc::now(),
        };
        self.repository.create(account).await.unwrap();
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn get_authenticated(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.get(path, Some(&format!("Bearer {}", token))).await
    }

    /// Log in and return the issued token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
