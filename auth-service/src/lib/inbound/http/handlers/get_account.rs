use std::collections::BTreeSet;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::Account;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::account::ports::AccountStore;
use crate::inbound::http::router::AppState;

/// Admin lookup of a provisioned account.
pub async fn get_account<R>(
    State(state): State<AppState<R>>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<GetAccountResponseData>, ApiError>
where
    R: AccountStore,
{
    let username = Username::new(username).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .account_service
        .get_account(&username)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetAccountResponseData {
    pub id: String,
    pub username: String,
    pub roles: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for GetAccountResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.as_str().to_string(),
            roles: account.roles.clone(),
            created_at: account.created_at,
        }
    }
}
