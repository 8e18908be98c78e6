//! Centralized default constants for stockroom.
//!
//! Server configuration falls back to these values when the corresponding
//! environment variable is unset or unparsable.

// =============================================================================
// SERVER
// =============================================================================

/// Default bind address.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 4000;

/// Directory holding the built browser client.
pub const STATIC_DIR: &str = "client/dist";

/// Origins allowed by CORS when `ALLOWED_ORIGINS` is unset.
pub const ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:4000";

/// Maximum accepted request body, in bytes.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

// =============================================================================
// DATABASE
// =============================================================================

/// SQLite database location.
pub const DATABASE_URL: &str = "sqlite://data/warehouse.sqlite";

/// Connection pool size.
pub const DB_MAX_CONNECTIONS: u32 = 5;

/// How long a writer waits on a locked database before failing, in seconds.
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// LOGGING
// =============================================================================

/// Env filter used when `RUST_LOG` is unset.
pub const LOG_FILTER: &str = "stockroom_api=debug,stockroom_db=info,tower_http=info";
