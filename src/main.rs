use std::net::SocketAddr;
use std::sync::Arc;

use rust_darkdata_api::config::Config;
use rust_darkdata_api::db::Database;
use rust_darkdata_api::handlers::AppState;
use rust_darkdata_api::{obs, routes};

/// Main entry point for the application.
///
/// Initializes tracing, configuration, the database pool and schema, the
/// record cache and generator, then serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    obs::init_tracing();

    let config = Config::from_env()?;

    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    let addr = format!("0.0.0.0:{}", config.port);
    let app_state = Arc::new(AppState::new(db.pool.clone(), config));
    tracing::info!(
        "Enricher ready with scorers: {:?}",
        app_state.enricher.scorer_names()
    );

    let app = routes::build_router(app_state)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer addresses feed the per-IP rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
