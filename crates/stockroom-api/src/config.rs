//! Server configuration from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `sqlite://data/warehouse.sqlite` |
//! | `HOST` / `PORT` | `0.0.0.0` / `4000` |
//! | `STATIC_DIR` | `client/dist` |
//! | `ALLOWED_ORIGINS` | `http://localhost:5173,http://localhost:4000` |
//! | `DB_MAX_CONNECTIONS` | `5` |
//! | `LOG_FORMAT` | `text` (`json` for structured output) |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |
//! | `RUST_LOG` | `stockroom_api=debug,stockroom_db=info,tower_http=info` |
//!
//! Unparsable numbers fall back to the default.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use stockroom_core::{defaults, Error, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Daily-rotated log file; stdout when `None`.
    pub file: Option<PathBuf>,
    /// Force ANSI colors on or off; auto-detected when `None`.
    pub ansi: Option<bool>,
    /// Env filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            file: None,
            ansi: None,
            default_filter: defaults::LOG_FILTER.to_string(),
        }
    }
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<HeaderValue>,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            allowed_origins: parse_allowed_origins(defaults::ALLOWED_ORIGINS),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |v: String| v == "true" || v == "1";

        Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.db_max_connections),
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| parse_allowed_origins(&v))
                .unwrap_or(defaults.allowed_origins),
            log: LogConfig {
                format: match get("LOG_FORMAT").as_deref() {
                    Some("json") => LogFormat::Json,
                    _ => LogFormat::Text,
                },
                file: get("LOG_FILE").map(PathBuf::from),
                ansi: get("LOG_ANSI").map(flag),
                default_filter: defaults.log.default_filter,
            },
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address: {}", e)))
    }
}

/// Parse a comma-separated CORS origin list, skipping invalid entries.
///
/// An empty list falls back to the defaults.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    if origins.trim().is_empty() {
        return parse_allowed_origins(defaults::ALLOWED_ORIGINS);
    }

    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}
