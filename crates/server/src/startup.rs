use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::todo_item::repo::{InMemoryTodoStore, SeaOrmTodoStore};
use service::TodoStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let addr = cfg.server.bind_addr();
    addr.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {addr}: {e}")))
}

/// Pick the store from config. The database backend connects and runs
/// pending migrations before serving.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let store: Arc<dyn TodoStore> = match cfg.storage.backend {
        StorageBackend::Memory => {
            info!(backend = "memory", "todo store initialized");
            Arc::new(InMemoryTodoStore::new())
        }
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Migration(e.to_string()))?;
            info!(backend = "database", "todo store initialized");
            Arc::new(SeaOrmTodoStore::new(db))
        }
    };
    Ok(ServerState::new(store))
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(&cfg)?;
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    info!(%addr, "starting todo server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_unparsable_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_uses_host_and_port() {
        let cfg = AppConfig::default();
        assert_eq!(bind_addr(&cfg).unwrap().to_string(), "127.0.0.1:8080");
    }
}
