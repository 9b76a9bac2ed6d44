//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_core::listing::DEFAULT_MAX_LIMIT;
use quill_infra::DatabaseConfig;

/// Configuration errors. Startup aborts on any of these.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Shared secret expected as the bearer token on admin routes.
    pub admin_token: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub max_page_limit: u64,
    pub run_migrations: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin_token = var("ADMIN_TOKEN").ok_or(ConfigError::Missing("ADMIN_TOKEN"))?;

        let database = DatabaseConfig {
            url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://quill.db?mode=rwc".to_string()),
            max_connections: parse(&var, "DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse(&var, "DB_MIN_CONNECTIONS", 1)?,
            log_statements: parse_flag(&var, "DB_LOG_STATEMENTS", false)?,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let max_page_limit = parse(&var, "MAX_PAGE_LIMIT", DEFAULT_MAX_LIMIT)?;
        if max_page_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_PAGE_LIMIT",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse(&var, "PORT", 8080)?,
            database,
            admin_token,
            cors_allowed_origins,
            max_page_limit,
            run_migrations: parse_flag(&var, "RUN_MIGRATIONS", true)?,
        })
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match var(key) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
