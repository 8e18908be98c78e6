//! HTTP handler modules for stockroom-api.

pub mod items;
pub mod system;

pub use items::{create_item, delete_item, get_item, list_items, update_item, zero_item};
pub use system::{health_check, list_categories};
