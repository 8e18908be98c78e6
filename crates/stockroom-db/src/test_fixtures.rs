//! Test fixtures for database integration tests.
//!
//! Provides reusable setup functions and test data builders for consistent
//! testing across the workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::test_fixtures::TestDatabase;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test_db = TestDatabase::new().await;
//!     let steel = test_db.seed_raw("Сталь", 5.0).await;
//!
//!     // Run your tests...
//! }
//! ```

use crate::{
    pool::PoolConfig, Category, CreateItemRequest, Database, Item, ItemRepository, RawMode,
};

/// In-memory SQLite URL. Each connect call yields a private database.
pub const TEST_DATABASE_URL: &str = "sqlite::memory:";

/// Isolated, migrated in-memory database.
///
/// The pool holds a single connection that is never recycled, so the data
/// lives exactly as long as this value.
pub struct TestDatabase {
    pub db: Database,
}

impl TestDatabase {
    /// Create a fresh database with the schema applied.
    pub async fn new() -> Self {
        let db = Database::connect_with_config(TEST_DATABASE_URL, PoolConfig::in_memory())
            .await
            .expect("Failed to create test database");
        db.migrate().await.expect("Failed to run migrations");
        Self { db }
    }

    /// Insert a raw item measured by weight.
    pub async fn seed_raw(&self, name: &str, weight: f64) -> Item {
        self.seed(Category::Raw, name, RawMode::Weight, weight).await
    }

    /// Insert a raw item measured by length.
    pub async fn seed_raw_length(&self, name: &str, length: f64) -> Item {
        self.seed(Category::Raw, name, RawMode::Length, length).await
    }

    /// Insert an equipment or supply item with a quantity.
    pub async fn seed_counted(&self, category: Category, name: &str, quantity: f64) -> Item {
        self.seed(category, name, RawMode::Weight, quantity).await
    }

    async fn seed(&self, category: Category, name: &str, mode: RawMode, amount: f64) -> Item {
        self.db
            .items
            .create_or_merge(CreateItemRequest {
                category,
                name: name.to_string(),
                mode,
                amount,
                force: false,
            })
            .await
            .expect("Failed to seed item")
            .into_item()
    }
}

/// Builder for a [`CreateItemRequest`] with test-friendly defaults.
#[derive(Debug, Clone)]
pub struct CreateItemBuilder {
    req: CreateItemRequest,
}

impl CreateItemBuilder {
    pub fn new(category: Category, name: &str) -> Self {
        Self {
            req: CreateItemRequest {
                category,
                name: name.to_string(),
                mode: RawMode::Weight,
                amount: 0.0,
                force: false,
            },
        }
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.req.amount = amount;
        self
    }

    pub fn length(mut self) -> Self {
        self.req.mode = RawMode::Length;
        self
    }

    pub fn force(mut self) -> Self {
        self.req.force = true;
        self
    }

    pub fn build(self) -> CreateItemRequest {
        self.req
    }
}
