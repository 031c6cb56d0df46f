use std::sync::Arc;

use anyhow::Context;
use common::admin_http::spawn_admin_server;
use configs::AppConfig;
use service::auth::TokenVerifier;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    io_client::HttpIoClient,
    observability::{BusinessMetrics, InfluxSink, MetricsSink, NoopSink},
    routes,
    state::AppState,
};

async fn metrics_sink(cfg: &AppConfig) -> anyhow::Result<Arc<dyn MetricsSink>> {
    if !cfg.metrics.enabled {
        return Ok(Arc::new(NoopSink));
    }
    let influx = InfluxSink::new(&cfg.metrics)?;
    if let Err(e) = influx.ensure_database().await {
        warn!(error = %e, url = %cfg.metrics.influx_url, "influx unavailable, metric writes may fail");
    }
    Ok(Arc::new(influx))
}

/// Wire the io-service client, token verifier and counters from configuration.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let io = HttpIoClient::new(&cfg.io_service).context("build io-service client")?;
    let metrics = BusinessMetrics::new(metrics_sink(cfg).await?).context("register metrics")?;
    Ok(AppState {
        io: Arc::new(io),
        verifier: TokenVerifier::new(&cfg.auth.jwt_secret),
        metrics: Arc::new(metrics),
    })
}

pub async fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    let state = build_state(cfg).await?;

    let metrics = Arc::clone(&state.metrics);
    spawn_admin_server(&cfg.metrics.admin_addr, Arc::new(move || metrics.encode()))
        .await
        .context("start admin server")?;

    let addr = cfg.business_server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, io_service = %cfg.io_service.base_url, "business-service listening");
    axum::serve(listener, routes::build_router(state)).await?;
    Ok(())
}
