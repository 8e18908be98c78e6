//! Core traits for stockroom abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ITEM REPOSITORY
// =============================================================================

/// Repository for stock items.
///
/// Implementations must keep `(category, name_key)` unique and must run each
/// mutating call as a single all-or-nothing write.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// List items in a category, ordered by name case-insensitively.
    async fn list(&self, req: ListItemsRequest) -> Result<Vec<Item>>;

    /// Fetch one item by id.
    async fn fetch(&self, id: i64) -> Result<Item>;

    /// Insert a new item, or add the amount to an existing same-named item
    /// when `force` is set. Fails with `DuplicateExists` otherwise.
    async fn create_or_merge(&self, req: CreateItemRequest) -> Result<CreateOutcome>;

    /// Apply a partial update.
    async fn update(&self, id: i64, req: UpdateItemRequest) -> Result<Item>;

    /// Clear the category-relevant quantity fields.
    async fn zero_out(&self, id: i64) -> Result<Item>;

    /// Permanently remove an item. Returns the removed id.
    async fn delete(&self, id: i64) -> Result<i64>;
}
