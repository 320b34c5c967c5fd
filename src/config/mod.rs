//! Application configuration from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default max request body size (64KB) for JSON endpoints.
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Per-office daily ticket number ceiling (wraps 99 -> 1).
pub const MAX_TICKET_NUMBER: i32 = 99;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host and port.
    pub server_addr: SocketAddr,

    /// Database connection URL.
    pub database_url: String,

    /// IANA timezone name defining local-midnight day boundaries
    /// for numbering and rollover (e.g. "Asia/Manila").
    pub timezone: String,

    /// Whether the registrar office accepts admits.
    pub registrar_enabled: bool,
    /// Whether the admissions office accepts admits.
    pub admissions_enabled: bool,

    /// Per-request deadline in milliseconds.
    pub request_timeout_ms: u64,

    /// Public (kiosk/portal) requests allowed per minute per IP.
    pub rate_limit_public_per_minute: u32,
    /// Auth attempts allowed per 15 minutes per IP.
    pub rate_limit_auth_per_15min: u32,

    /// CORS allowed origins (comma-separated).
    pub cors_origins: Vec<String>,

    /// Max request body size in bytes.
    pub max_body_size: usize,

    /// Log level filter.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`: PostgreSQL connection string.
    ///
    /// Optional (defaults documented on each field):
    /// - `HOST`, `PORT`
    /// - `TIMEZONE` (default `UTC`)
    /// - `OFFICE_REGISTRAR_ENABLED`, `OFFICE_ADMISSIONS_ENABLED` (default `true`)
    /// - `REQUEST_TIMEOUT_MS` (default 30000)
    /// - `RATE_LIMIT_PUBLIC_PER_MINUTE` (default 100)
    /// - `RATE_LIMIT_AUTH_PER_15MIN` (default 50)
    /// - `CORS_ORIGINS` (default `*`)
    /// - `RUST_LOG`
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?;
        Ok(Self::build(Some(database_url)))
    }

    /// Load configuration, allowing missing optional values for development.
    pub fn from_env_or_defaults() -> Self {
        Self::build(None)
    }

    fn build(database_url: Option<String>) -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .unwrap_or(3001);

        let server_addr = format!("{}:{}", host, port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3001)));

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let log_filter = env::var("RUST_LOG")
            .unwrap_or_else(|_| "queue_dispatcher=debug,tower_http=debug".to_string());

        Config {
            server_addr,
            database_url: database_url
                .or_else(|| env::var("DATABASE_URL").ok())
                .unwrap_or_else(|| "postgres://localhost/queue_dev".to_string()),
            timezone: env::var("TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            registrar_enabled: env_bool("OFFICE_REGISTRAR_ENABLED", true),
            admissions_enabled: env_bool("OFFICE_ADMISSIONS_ENABLED", true),
            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            rate_limit_public_per_minute: env::var("RATE_LIMIT_PUBLIC_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            rate_limit_auth_per_15min: env::var("RATE_LIMIT_AUTH_PER_15MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            cors_origins,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            log_filter,
        }
    }

    /// Whether the given office currently accepts admits.
    pub fn office_enabled(&self, office: crate::models::Office) -> bool {
        match office {
            crate::models::Office::Registrar => self.registrar_enabled,
            crate::models::Office::Admissions => self.admissions_enabled,
        }
    }

    /// The request deadline as a `Duration`.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"),
        Err(_) => default,
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => {
                write!(f, "Missing required environment variable: {}", var)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_or_defaults() {
        let config = Config::from_env_or_defaults();
        assert_eq!(config.server_addr.port(), 3001);
        assert!(!config.cors_origins.is_empty());
        assert_eq!(config.request_timeout_ms, 30_000);
        assert!(config.registrar_enabled);
        assert!(config.admissions_enabled);
    }

    #[test]
    fn test_office_enabled_defaults_true() {
        let config = Config::from_env_or_defaults();
        assert!(config.office_enabled(crate::models::Office::Registrar));
        assert!(config.office_enabled(crate::models::Office::Admissions));
    }

    #[test]
    fn test_request_timeout_duration() {
        let mut config = Config::from_env_or_defaults();
        config.request_timeout_ms = 5_000;
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(5));
    }
}
