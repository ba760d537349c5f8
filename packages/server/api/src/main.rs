use axum::{routing::get, Json, Router};
use dotenv::dotenv;
use serde_json::json;
use shared::config::SyncConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use vartree::MemoryTree;

mod handlers;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load Config (immutable snapshot for the process lifetime)
    let config = Arc::new(SyncConfig::from_env()?);

    // Build the variable tree and bring its structure in line with the
    // enable flags before accepting any data.
    let tree = Arc::new(MemoryTree::new());
    vartree::reconcile(tree.as_ref(), &config.flags).await?;

    let app_state = AppState {
        config,
        sink: tree,
    };

    // Setup Router using handlers
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(handlers::webhook::router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .with_state(app_state);

    // Start Server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HealthBridge API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
