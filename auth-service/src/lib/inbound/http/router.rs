use std::sync::Arc;
use std::time::Duration;

use auth_core::AuthenticationService;
use auth_core::TokenValidationFilter;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::get_account::get_account;
use super::handlers::me::me;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_role;
use super::middleware::RequiredRole;
use crate::domain::account::ports::AccountStore;
use crate::domain::account::service::AccountService;

pub struct AppState<R>
where
    R: AccountStore,
{
    pub account_service: Arc<AccountService<R>>,
    pub authentication: Arc<AuthenticationService<R>>,
    pub token_filter: Arc<TokenValidationFilter>,
}

impl<R> Clone for AppState<R>
where
    R: AccountStore,
{
    fn clone(&self) -> Self {
        Self {
            account_service: Arc::clone(&self.account_service),
            authentication: Arc::clone(&self.authentication),
            token_filter: Arc::clone(&self.token_filter),
        }
    }
}

/// Build the HTTP application.
///
/// # Arguments
/// * `admin_role` - Role required by the account lookup endpoint
pub fn create_router<R>(
    account_service: Arc<AccountService<R>>,
    authentication: Arc<AuthenticationService<R>>,
    token_filter: Arc<TokenValidationFilter>,
    admin_role: impl Into<String>,
) -> Router
where
    R: AccountStore,
{
    let state = AppState {
        account_service,
        authentication,
        token_filter,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(authenticate::<R>))
        .route("/api/accounts", post(register::<R>));

    let admin_routes = Router::new()
        .route("/api/accounts/:username", get(get_account::<R>))
        .route_layer(middleware::from_fn_with_state(
            RequiredRole::new(admin_role),
            require_role,
        ));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R>,
        ));

    // Headers stay out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
