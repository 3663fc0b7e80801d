use std::sync::Arc;

use auth_core::AuthenticationService;
use auth_core::CredentialVerifier;
use auth_core::TokenValidationFilter;
use auth_service::config::Config;
use auth_service::domain::account::service::AccountService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::PostgresAccountRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.expiration_minutes,
        admin_role = %config.authorization.admin_role,
        verify_subject = config.authorization.verify_subject,
        default_role = %config.accounts.default_role,
        "Configuration loaded"
    );

    // Refuse to serve without a usable signing key
    let token_codec = Arc::new(config.jwt.token_codec().map_err(|e| {
        tracing::error!(error = %e, "Invalid token configuration");
        e
    })?);

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool));

    let verifier = CredentialVerifier::new(Arc::clone(&account_repository))?;
    let authentication = Arc::new(AuthenticationService::new(
        verifier,
        Arc::clone(&token_codec),
    ));

    let mut token_filter = TokenValidationFilter::new(Arc::clone(&token_codec));
    if config.authorization.verify_subject {
        token_filter = token_filter.with_store(account_repository.clone());
    }

    let account_service = Arc::new(AccountService::new(
        account_repository,
        config.accounts.default_role.clone(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        account_service,
        authentication,
        Arc::new(token_filter),
        config.authorization.admin_role.clone(),
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
