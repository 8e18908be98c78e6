//! Service-level endpoints: health and the category catalogue.

use axum::{extract::State, Json};
use serde::Serialize;

use stockroom_core::{Category, CategoryInfo};
use stockroom_db::log_pool_metrics;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Database file name.
    pub db: String,
    pub version: &'static str,
}

/// Report liveness and the database in use.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    log_pool_metrics(state.db.pool());
    Json(HealthResponse {
        status: "ok",
        db: state.db.location().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// List the fixed categories with their display titles.
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(Category::ALL.into_iter().map(CategoryInfo::from).collect())
}
