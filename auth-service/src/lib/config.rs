use std::env;
use std::fmt;

use auth_core::CodecConfigError;
use auth_core::SigningKey;
use auth_core::TokenCodec;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for auth-service.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub authorization: AuthorizationConfig,
    pub accounts: AccountsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing configuration.
///
/// `secret` has no default: a deployment without one fails to load.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
}

/// Role policy applied to gated endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthorizationConfig {
    pub admin_role: String,
    /// Re-check that a token's subject still exists on every request
    pub verify_subject: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountsConfig {
    /// Role granted to self-registered accounts
    pub default_role: String,
}

impl JwtConfig {
    /// Build the token codec from this configuration.
    ///
    /// # Errors
    /// * `MissingKey` / `KeyTooShort` - Unusable signing key
    /// * `NonPositiveTtl` - `expiration_minutes` is not positive
    /// * `TtlOutOfRange` - `expiration_minutes` exceeds the codec maximum
    pub fn token_codec(&self) -> Result<TokenCodec, CodecConfigError> {
        let key = SigningKey::new(self.secret.as_bytes())?;
        let ttl = Duration::try_minutes(self.expiration_minutes).ok_or(
            CodecConfigError::TtlOutOfRange {
                max_days: TokenCodec::MAX_TTL_DAYS,
            },
        )?;
        TokenCodec::new(key, ttl)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (token TTL, role names, port)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("jwt.expiration_minutes", TokenCodec::DEFAULT_TTL_MINUTES)?
            .set_default("authorization.admin_role", "ADMIN")?
            .set_default("authorization.verify_subject", true)?
            .set_default("accounts.default_role", "USER")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
