//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 8080)
//! - `ADMIN_UPLOAD_DIR` - Directory for uploaded category images (default: uploads)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Application properties
//!
//! `app.*` keys are read from their upper-cased, underscore-separated
//! environment form (`app.pagination.default-size` is
//! `APP_PAGINATION_DEFAULT_SIZE`). See [`pagination`] and [`security`].

pub mod pagination;
pub mod security;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

pub use pagination::{PageRequest, Pagination, PaginationProperties};
pub use security::{CorsProperties, LoginProperties, PasswordPolicy, SecurityProperties};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Source of raw configuration values, keyed by environment variable name.
///
/// The process environment in production; a map in tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Where uploaded category images are written
    pub upload_dir: PathBuf,
    /// `app.pagination.*`
    pub pagination: PaginationProperties,
    /// `app.security.*`
    pub security: SecurityProperties,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any value
    /// fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&process_env)
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Same as [`AdminConfig::from_env`].
    pub fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let database_url = env("ADMIN_DATABASE_URL")
            .or_else(|| env("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_DATABASE_URL".to_string()))?;
        let host = parse_or(env, "ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or(env, "ADMIN_PORT", 8080_u16)?;
        let base_url = required(env, "ADMIN_BASE_URL")?;
        let upload_dir = env("ADMIN_UPLOAD_DIR").map_or_else(|| PathBuf::from("uploads"), PathBuf::from);

        let pagination = PaginationProperties::from_lookup(env)?;
        let security = SecurityProperties::from_lookup(env)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            upload_dir,
            pagination,
            security,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or(env, "SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_or(env, "SENTRY_TRACES_SAMPLE_RATE", 1.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn required(env: EnvLookup<'_>, key: &str) -> Result<String, ConfigError> {
    env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` if present, otherwise use `default`. Blank values count as absent.
fn parse_or<T>(env: EnvLookup<'_>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse a boolean flag; accepts `true/false`, `1/0`, `yes/no`, `on/off`.
fn parse_flag(env: EnvLookup<'_>, key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = env(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse a comma-separated list, dropping empty entries.
fn parse_list(env: EnvLookup<'_>, key: &str) -> Vec<String> {
    env(key)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Build a lookup over a fixed set of pairs.
    pub(crate) fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let env = lookup(&[
            ("ADMIN_DATABASE_URL", "postgres://localhost/bacoge"),
            ("ADMIN_BASE_URL", "http://localhost:8080"),
        ]);
        let config = AdminConfig::from_lookup(&env).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.pagination.default_size, 20);
        assert_eq!(config.pagination.max_size, 100);
        assert!(!config.is_https());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_falls_back_to_generic_variable() {
        let env = lookup(&[
            ("DATABASE_URL", "postgres://fly/bacoge"),
            ("ADMIN_BASE_URL", "https://admin.bacoge.com"),
        ]);
        let config = AdminConfig::from_lookup(&env).unwrap();
        assert!(config.is_https());
    }

    #[test]
    fn test_missing_database_url() {
        let env = lookup(&[("ADMIN_BASE_URL", "http://localhost:8080")]);
        let err = AdminConfig::from_lookup(&env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ADMIN_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let env = lookup(&[
            ("ADMIN_DATABASE_URL", "postgres://localhost/bacoge"),
            ("ADMIN_BASE_URL", "http://localhost:8080"),
            ("ADMIN_PORT", "eighty"),
        ]);
        let err = AdminConfig::from_lookup(&env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ADMIN_PORT"));
    }

    #[test]
    fn test_parse_flag_variants() {
        let env = lookup(&[("A", "yes"), ("B", "OFF"), ("C", "maybe")]);
        assert!(parse_flag(&env, "A", false).unwrap());
        assert!(!parse_flag(&env, "B", true).unwrap());
        assert!(parse_flag(&env, "C", true).is_err());
        assert!(parse_flag(&env, "MISSING", true).unwrap());
    }

    #[test]
    fn test_parse_list_trims_entries() {
        let env = lookup(&[("ORIGINS", " https://a.com, ,https://b.com ")]);
        assert_eq!(parse_list(&env, "ORIGINS"), vec!["https://a.com", "https://b.com"]);
        assert!(parse_list(&env, "NONE").is_empty());
    }
}
