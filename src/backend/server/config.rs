/**
 * Server Configuration
 *
 * Loads server configuration from environment variables (a `.env` file is
 * read by `main` before this runs).
 *
 * # Variables
 *
 * | Variable | Required | Default |
 * |----------|----------|---------|
 * | `SERVER_PORT` | no | `3060` |
 * | `ACCESS_SECRET` | yes | |
 * | `TOKEN_TTL_SECS` | no | `3600` |
 * | `DATABASE_URL` | no | in-memory stores |
 * | `BOOTSTRAP_ADMIN_USERNAME` / `_EMAIL` / `_PASSWORD` | no | no bootstrap admin |
 *
 * # Error Handling
 *
 * A missing signing secret or a malformed number stops startup. A missing or
 * unreachable database does not: the server logs a warning and runs on
 * in-memory stores.
 */

use sqlx::PgPool;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3060;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Account created at startup when the admin table has no such username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// HMAC secret shared by token issuing and validation
    pub access_secret: String,
    pub token_ttl: chrono::Duration,
    pub database_url: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "TOKEN_TTL_SECS",
                    value: raw,
                })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let access_secret = get("ACCESS_SECRET").ok_or(ConfigError::Missing("ACCESS_SECRET"))?;

        let bootstrap_admin = match (
            get("BOOTSTRAP_ADMIN_USERNAME"),
            get("BOOTSTRAP_ADMIN_EMAIL"),
            get("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(BootstrapAdmin {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            port,
            access_secret,
            token_ttl: chrono::Duration::seconds(ttl_secs),
            database_url: get("DATABASE_URL"),
            bootstrap_admin,
        })
    }
}

/// Connect to PostgreSQL and run migrations
///
/// Returns `None` if the connection fails; the caller falls back to
/// in-memory stores.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory stores.");
            return None;
        }
    };
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
