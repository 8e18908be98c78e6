//! Error types for stockroom.

use thiserror::Error;

use crate::models::Item;

/// Result type alias using stockroom's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stockroom operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Category is not one of raw, equipment, supply
    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    /// Name is empty after trimming
    #[error("Name is required")]
    MissingName,

    /// Quantity field is negative, non-finite, or not a number
    #[error("{0} must be a non-negative number")]
    InvalidAmount(String),

    /// Another item in the same category already has this name.
    ///
    /// Carries the existing record so the caller can decide to merge.
    #[error("Item already exists: {}", .0.name)]
    DuplicateExists(Box<Item>),

    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(i64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by caller input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidCategory(_) | Error::MissingName | Error::InvalidAmount(_)
        )
    }
}
