//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. `.env.<APP_ENV>` (then `.env`) is read first if present, and
//! real environment variables win over both.
//!
//! The resulting [`AppConfig`] is built once in `main` and handed to the
//! router state; nothing reads the environment after startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use kasir_db::DbConfig;
use serde::Serialize;

/// API server configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Environment name (`development`, `production`, ...)
    pub env: String,

    /// Service name reported by `/health` and `/`
    pub name: String,

    /// Service version reported by `/health` and `/`
    pub version: String,

    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// SQLite database file (`:memory:` for an in-memory database)
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Bound on how long a checkout waits for the inventory lock
    pub db_lock_timeout_ms: u64,

    /// Shared secret for `/api/*`; `None` disables the check
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = AppConfig {
            env: get("APP_ENV").unwrap_or_else(|| "development".to_string()),
            name: get("APP_NAME").unwrap_or_else(|| "kasir-api".to_string()),
            version: get("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 8080)?,
            request_timeout_secs: parse_or(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 15)?,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "./kasir.db".to_string()),
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            db_lock_timeout_ms: parse_or(get("DB_LOCK_TIMEOUT_MS"), "DB_LOCK_TIMEOUT_MS", 5000)?,
            api_key: get("API_KEY"),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        if config.is_production() && config.api_key.is_none() {
            return Err(ConfigError::MissingRequired("API_KEY".to_string()));
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let base = if self.database_path == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
        };
        base.lock_timeout(Duration::from_millis(self.db_lock_timeout_ms))
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Loads `.env.<APP_ENV>` and then `.env`, ignoring missing files.
///
/// Variables already present in the environment are never overridden.
pub fn load_dotenv() {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let _ = dotenvy::from_filename(format!(".env.{app_env}"));
    let _ = dotenvy::dotenv();
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
