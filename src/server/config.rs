/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration from
 * environment variables, and opening the SQLite connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is read once at startup. `DATABASE_URL` and `JWT_SECRET`
 * are required; everything else has a development default. The federated
 * identity provider is configured by five `OAUTH_*` variables that must
 * be set together or not at all.
 *
 * # Error Handling
 *
 * A missing or invalid required variable fails startup with a
 * `ConfigError` naming the variable. The signing secret and the database
 * are load-bearing, so unlike the optional provider they are never
 * silently disabled.
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

/// Minimum byte length accepted for the token signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime in seconds (one hour).
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Default frontend origin for CORS and federated redirects.
const DEFAULT_FRONTEND_URL: &str = "http://localhost:8081";

/// Default port the HTTP server binds to.
const DEFAULT_SERVER_PORT: u16 = 3000;

/// The environment variables that configure the federated provider.
const PROVIDER_VARS: [&str; 5] = [
    "OAUTH_TOKEN_URL",
    "OAUTH_USERINFO_URL",
    "OAUTH_CLIENT_ID",
    "OAUTH_CLIENT_SECRET",
    "OAUTH_REDIRECT_URL",
];

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// The token signing secret is too short for HMAC signing
    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    /// An environment variable is set but does not parse
    #[error("Invalid value for {name}: {message}")]
    Invalid {
        name: &'static str,
        message: String,
    },

    /// Some but not all of the provider variables are set
    #[error("Incomplete federated provider configuration: {0} is not set")]
    PartialProvider(&'static str),
}

/// Endpoints and credentials for the federated identity provider
#[derive(Debug, Clone)]
pub struct FederatedProviderConfig {
    /// Token endpoint URL (code-for-token exchange)
    pub token_url: String,
    /// Userinfo endpoint URL (token-for-claims exchange)
    pub userinfo_url: String,
    /// Client identifier registered with the provider
    pub client_id: String,
    /// Client secret registered with the provider
    pub client_secret: String,
    /// Redirect URL registered with the provider
    pub redirect_url: String,
}

/// Validated server configuration
///
/// Built once at startup by [`ServerConfig::from_env`] and consumed by
/// `create_app`. Handlers never read environment variables themselves.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite URL, e.g. `sqlite://learnhub.db`
    pub database_url: String,
    /// Token signing secret, at least [`MIN_SECRET_LEN`] bytes
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Frontend origin, used for CORS and federated redirects
    pub frontend_url: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Federated provider, `None` when the `OAUTH_*` variables are unset
    pub provider: Option<FederatedProviderConfig>,
}

impl ServerConfig {
    /// Load and validate configuration from environment variables
    ///
    /// # Returns
    ///
    /// The validated configuration, or the first `ConfigError` found:
    ///
    /// - `DATABASE_URL` missing
    /// - `JWT_SECRET` missing or shorter than [`MIN_SECRET_LEN`] bytes
    /// - `TOKEN_TTL_SECS` or `SERVER_PORT` set but not a number
    /// - an incomplete `OAUTH_*` block
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_var("DATABASE_URL")?;

        let jwt_secret = require_var("JWT_SECRET")?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let token_ttl_secs = parse_var("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        let port = parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?;

        // Trailing slashes would double up when callback paths are appended.
        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let provider = load_provider()?;

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl_secs,
            frontend_url,
            port,
            provider,
        })
    }
}

/// Read a required environment variable
fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

/// Read an optional environment variable, parsing it when set
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            message: err.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Load the federated provider block
///
/// All five `OAUTH_*` variables unset means the provider is simply not
/// configured. A partial block is a deployment mistake and fails startup
/// naming the first missing variable.
fn load_provider() -> Result<Option<FederatedProviderConfig>, ConfigError> {
    if PROVIDER_VARS.iter().all(|name| std::env::var(name).is_err()) {
        return Ok(None);
    }

    Ok(Some(FederatedProviderConfig {
        token_url: provider_var("OAUTH_TOKEN_URL")?,
        userinfo_url: provider_var("OAUTH_USERINFO_URL")?,
        client_id: provider_var("OAUTH_CLIENT_ID")?,
        client_secret: provider_var("OAUTH_CLIENT_SECRET")?,
        redirect_url: provider_var("OAUTH_REDIRECT_URL")?,
    }))
}

fn provider_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::PartialProvider(name))
}

/// Open the SQLite pool and run migrations
///
/// This function:
/// 1. Parses `database_url` into SQLite connect options
/// 2. Creates the database file if it does not exist
/// 3. Opens the pool with WAL journaling and a 5s busy timeout
/// 4. Runs the embedded migrations
///
/// # Arguments
///
/// * `database_url` - SQLite URL, e.g. `sqlite://learnhub.db`
///
/// # Returns
///
/// The ready connection pool, or the connection/migration error
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
