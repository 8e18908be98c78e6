//! # stockroom-core
//!
//! Core types, traits, and abstractions for the stockroom inventory service.
//!
//! This crate provides the domain model (categories, items, stock
//! arithmetic), the repository trait the storage layer implements, and the
//! validation rules shared by the store and the HTTP API.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use validation::{check_amount, name_key, parse_amount, parse_optional_amount, require_name};
