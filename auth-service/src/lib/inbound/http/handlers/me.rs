use std::collections::BTreeSet;

use auth_core::AuthenticatedPrincipal;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;

/// Identity of the caller as established by the token filter.
pub async fn me(
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, principal.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub username: String,
    pub roles: BTreeSet<String>,
}

impl From<AuthenticatedPrincipal> for MeResponseData {
    fn from(principal: AuthenticatedPrincipal) -> Self {
        Self {
            username: principal.username,
            roles: principal.roles,
        }
    }
}
