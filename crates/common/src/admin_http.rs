//! Lightweight admin HTTP server
//!
//! Exposes `/healthz` and `/metrics`, with the metrics body rendered by the caller.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Renders the `/metrics` response on every scrape.
pub type MetricsRenderer = Arc<dyn Fn() -> (StatusCode, String) + Send + Sync>;

async fn healthz() -> &'static str {
    "OK"
}

/// Build the admin router without binding it.
pub fn admin_router(render: MetricsRenderer) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { render() }))
}

/// Spawn the admin server on the current tokio runtime.
pub async fn spawn_admin_server(addr: &str, render: MetricsRenderer) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "admin server listening");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, admin_router(render)).await {
            error!(error = %e, "admin server stopped");
        }
    });
    Ok(())
}
