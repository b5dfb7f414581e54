use std::{future::Future, net::SocketAddr};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use service::{Services, Stores};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Stores and services for the configured backend. The database backend
/// connects and, unless disabled, applies pending migrations first.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let services = match cfg.storage.backend {
        StorageBackend::Memory => {
            warn!(event = "memory_backend", "in-memory storage: data is lost on restart");
            Services::in_memory()
        }
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Migration(e.to_string()))?;
                info!(event = "migrations_applied", "schema up to date");
            }
            Services::new(Stores::sea_orm(db))
        }
    };
    Ok(AppState::new(services))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, event = "listening", "therapy scheduler api ready");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "drained", "in-flight requests finished");
    Ok(())
}

/// Public entry: load configuration and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load()?;
    serve(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
