use anyhow::Context;
use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes;

/// Serve the io-service router on an already bound listener.
pub async fn serve(listener: TcpListener, db: DatabaseConnection) -> anyhow::Result<()> {
    let app: Router = routes::build_router(db);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Connect to the store, apply pending migrations and serve until the
/// listener fails.
pub async fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("connect database")?;
    migration::Migrator::up(&db, None).await.context("apply migrations")?;

    let addr = cfg.io_server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "io-service listening");
    serve(listener, db).await
}
