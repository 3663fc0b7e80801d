use std::collections::BTreeSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::account::ports::AccountStore;
use crate::inbound::http::router::AppState;

pub async fn register<R>(
    State(state): State<AppState<R>>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError>
where
    R: AccountStore,
{
    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    username: String,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterAccountCommand, AccountError> {
        let username = Username::new(self.username)?;
        RegisterAccountCommand::new(username, self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub id: String,
    pub username: String,
    pub roles: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for RegisterResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.as_str().to_string(),
            roles: account.roles.clone(),
            created_at: account.created_at,
        }
    }
}
