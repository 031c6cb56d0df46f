use anyhow::Context;
use configs::AppConfig;
use service::auth::TokenIssuer;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes;

pub async fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    let issuer = TokenIssuer::new(&cfg.auth.jwt_secret, cfg.auth.token_ttl_secs);
    let addr = cfg.auth_server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, ttl_secs = ?cfg.auth.token_ttl_secs, "auth-server listening");
    axum::serve(listener, routes::build_router(issuer)).await?;
    Ok(())
}
