//! stockroom-api server binary.

use tracing::info;

use stockroom_api::{build_router, telemetry, AppState, ServerConfig};
use stockroom_db::{Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    let _log_guard = telemetry::init_tracing(&config.log);

    let db = Database::connect_with_config(
        &config.database_url,
        PoolConfig::default().max_connections(config.db_max_connections),
    )
    .await?;
    db.migrate().await?;
    info!(
        subsystem = "database",
        db = db.location(),
        "Database ready"
    );

    if !config.static_dir.join("index.html").exists() {
        info!(
            static_dir = %config.static_dir.display(),
            "No built client found; only /api is served"
        );
    }

    let addr = config.bind_addr()?;
    let app = build_router(AppState::new(db), &config);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
