//! HTTP server for deepvista
//!
//! Exposes `/health`, `/chat` and `/process-youtube-video`.

pub mod error;
mod extract;
pub mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Settings;

pub use routes::{build_router, cors_layer};
pub use state::AppState;

/// Run the server until Ctrl-C
pub async fn run(settings: &Settings) -> Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = build_router(state, cors_layer(&settings.server.cors_origins)?);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down server");
}
