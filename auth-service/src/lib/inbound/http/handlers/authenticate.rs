use auth_core::AuthenticationError;
use auth_core::CredentialRequest;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AccountStore;
use crate::inbound::http::router::AppState;

pub async fn authenticate<R>(
    State(state): State<AppState<R>>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError>
where
    R: AccountStore,
{
    let token = state
        .authentication
        .login(CredentialRequest::new(body.username, body.password))
        .await
        .map_err(|e| match e {
            AuthenticationError::AuthenticationFailed(_) => ApiError::invalid_credentials(),
            _ => ApiError::internal(),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthenticateResponseData {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.authentication.token_ttl().num_seconds(),
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}
