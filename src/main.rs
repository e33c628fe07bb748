use std::sync::Arc;

use tracker_api::config;
use tracker_api::database::manager::DatabaseManager;
use tracker_api::database::store::PgStore;
use tracker_api::server::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Tracker API in {:?} mode", config.environment);

    let pool = DatabaseManager::pool()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let state = AppState::new(Arc::new(PgStore::new(pool)));
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("TRACKER_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Tracker API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
