//! # stockroom-db
//!
//! SQLite database layer for stockroom.
//!
//! This crate provides:
//! - Connection pool management
//! - The item store (`SqliteItemRepository`)
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use stockroom_db::{Category, CreateItemRequest, Database, ItemRepository, RawMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://data/warehouse.sqlite").await?;
//!     db.migrate().await?;
//!
//!     let outcome = db.items.create_or_merge(CreateItemRequest {
//!         category: Category::Raw,
//!         name: "Сталь".to_string(),
//!         mode: RawMode::Weight,
//!         amount: 5.0,
//!         force: false,
//!     }).await?;
//!
//!     println!("Created item: {}", outcome.item().id);
//!     Ok(())
//! }
//! ```
pub mod items;
pub mod pool;

// Test fixtures for integration tests; public so the API crate's tests can use them
#[cfg(feature = "migrations")]
pub mod test_fixtures;

// Re-export core types
pub use stockroom_core::*;

pub use items::SqliteItemRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Sqlite>,
    /// Item repository for stock operations.
    pub items: SqliteItemRepository,
    /// Database file name, reported by the health endpoint.
    location: String,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        Self::with_location(pool, ":memory:")
    }

    fn with_location(pool: sqlx::Pool<sqlx::Sqlite>, location: &str) -> Self {
        Self {
            items: SqliteItemRepository::new(pool.clone()),
            location: location.to_string(),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::with_location(pool, &location_name(url)))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    /// File name of the database, or `:memory:`.
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Reduce a SQLite URL to the database file name.
fn location_name(url: &str) -> String {
    let path = url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return ":memory:".to_string();
    }
    std::path::Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_name_file_url() {
        assert_eq!(location_name("sqlite://data/warehouse.sqlite"), "warehouse.sqlite");
        assert_eq!(location_name("sqlite:stock.db?mode=rwc"), "stock.db");
        assert_eq!(location_name("sqlite:///var/lib/stockroom/items.db"), "items.db");
    }

    #[test]
    fn test_location_name_memory() {
        assert_eq!(location_name("sqlite::memory:"), ":memory:");
        assert_eq!(location_name("sqlite://"), ":memory:");
    }
}
