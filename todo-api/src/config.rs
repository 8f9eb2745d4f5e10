/// Configuration management for the API server
///
/// Configuration is read once at startup from environment variables (a `.env`
/// file is loaded first when present) into an immutable [`Config`] that is
/// handed to the router through `AppState`.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SCHEMA_STRICT`: Abort startup when migrations fail (default: false)
/// - `JWT_SECRET`: Shared secret for token signatures (required)
/// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
/// - `JWT_EXPIRATION_HOURS`: Lifetime of minted tokens (default: 1)
/// - `CORS_ORIGINS` / `CORS_ORIGIN`: Comma-separated allowed origins
///   (default: http://localhost:3000)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT` / `API_PORT`: Port to bind to (default: 8000)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use todo_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::anyhow;
use std::env;
use std::str::FromStr;
use todo_shared::auth::jwt::{
    check_expiration_hours, parse_algorithm, Algorithm, TokenSettings, DEFAULT_EXPIRATION_HOURS,
};
use todo_shared::db::pool;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token verification settings
    pub jwt: TokenSettings,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` = permissive, development only)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Whether a failed startup migration aborts the process
    pub schema_strict: bool,
}

impl DatabaseConfig {
    /// Pool settings for `todo_shared::db::pool`
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            ..Default::default()
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT").or_else(|| lookup("API_PORT")) {
            Some(raw) => parse_value::<u16>("PORT", &raw)?,
            None => 8000,
        };

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS")
                .or_else(|| lookup("CORS_ORIGIN"))
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        );

        let url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let schema_strict = match lookup("SCHEMA_STRICT") {
            Some(raw) => parse_bool("SCHEMA_STRICT", &raw)?,
            None => false,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                max_connections,
                schema_strict,
            },
            jwt: token_settings_from_lookup(&lookup)?,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether CORS runs in permissive (wildcard) mode
    pub fn cors_is_permissive(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Loads only the token settings from the environment
///
/// Used by tools that sign or verify tokens without touching the database.
pub fn token_settings_from_env() -> anyhow::Result<TokenSettings> {
    dotenvy::dotenv().ok();

    token_settings_from_lookup(&|key: &str| env::var(key).ok())
}

fn token_settings_from_lookup<F>(lookup: &F) -> anyhow::Result<TokenSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let secret = lookup("JWT_SECRET")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("JWT_SECRET environment variable is required"))?;

    if secret.len() < 32 {
        tracing::warn!("JWT_SECRET is shorter than 32 bytes; use a longer secret in production");
    }

    let algorithm = match lookup("JWT_ALGORITHM") {
        Some(raw) => parse_algorithm(&raw).map_err(|e| anyhow!("JWT_ALGORITHM: {}", e))?,
        None => Algorithm::HS256,
    };

    let expiration_hours = parse_or(lookup, "JWT_EXPIRATION_HOURS", DEFAULT_EXPIRATION_HOURS)?;
    let expiration_hours =
        check_expiration_hours(expiration_hours).map_err(|e| anyhow!("JWT_EXPIRATION_HOURS: {}", e))?;

    Ok(TokenSettings::new(secret, algorithm)?.with_expiration_hours(expiration_hours))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

fn parse_value<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{} has an invalid boolean value {:?}", key, raw)),
    }
}
