use auth_core::has_role;
use auth_core::AuthenticatedPrincipal;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::account::ports::AccountStore;
use crate::inbound::http::router::AppState;

/// Role a route layer demands from the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRole(pub String);

impl RequiredRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }
}

/// Middleware that validates the bearer token and adds the principal to request extensions
pub async fn authenticate<R>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    R: AccountStore,
{
    // Owned copy: the request body is not Sync, so no borrow may cross the await
    let credential = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let principal = state
        .token_filter
        .authorize(credential.as_deref())
        .await
        .map_err(|rejected| {
            tracing::warn!(
                method = %req.method(),
                uri = %req.uri(),
                reason = %rejected.reason,
                stage = ?rejected.stage(),
                "Request rejected"
            );
            ApiError::unauthorized()
        })?;

    tracing::debug!(username = %principal.username, "Request authenticated");

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Middleware that lets the request through only if the principal holds the role.
///
/// Must run after [`authenticate`].
pub async fn require_role(
    State(required): State<RequiredRole>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(principal) = req.extensions().get::<AuthenticatedPrincipal>() else {
        return Err(ApiError::unauthorized());
    };

    if !has_role(principal, &required.0) {
        tracing::warn!(
            username = %principal.username,
            required_role = %required.0,
            uri = %req.uri(),
            "Role check failed"
        );
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    Ok(next.run(req).await)
}
