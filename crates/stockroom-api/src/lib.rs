//! # stockroom-api
//!
//! HTTP API for the stockroom inventory service.
//!
//! Serves the item REST endpoints under `/api` and the built browser client
//! for every other path. Handlers are thin: they parse loosely-typed
//! request bodies, delegate to the item store in `stockroom-db`, and map
//! store errors onto HTTP statuses through [`ApiError`].

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod telemetry;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use uuid::Uuid;

use stockroom_core::defaults;
use stockroom_db::Database;

pub use config::ServerConfig;
pub use error::ApiError;

use handlers::{
    create_item, delete_item, get_item, health_check, list_categories, list_items, update_item,
    zero_item,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// UUIDv7 request IDs: time-ordered, so logs sort by arrival.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Unmatched paths under `/api` answer with JSON instead of the client.
async fn api_not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Build the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(list_categories))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/items/:id/zero", post(zero_item))
        .fallback(api_not_found);

    // single-page client: unknown paths get index.html
    let client = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .fallback_service(client)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(defaults::BODY_LIMIT_BYTES))
        .with_state(state)
}
