use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::sqlx::ConnectOptions as _;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxSqliteConnector};
use tracing::info;

/// Build `ConnectOptions` from config and open the pool.
///
/// `sqlite::memory:` URLs go through [`connect_sqlite_memory`].
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    if is_sqlite_memory(&cfg.url) {
        return connect_sqlite_memory(cfg).await;
    }
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// An in-memory SQLite database lives only as long as its connection.
/// The pool holds exactly one connection and never retires it.
async fn connect_sqlite_memory(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut conn_opts: SqliteConnectOptions = cfg.url.parse()?;
    if !cfg.sqlx_logging {
        conn_opts = conn_opts.disable_statement_logging();
    }
    let pool = memory_pool_options(cfg).connect_with(conn_opts).await?;
    info!(backend = "sqlite", event = "memory_db_connected", "database connected");
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

fn memory_pool_options(cfg: &DatabaseConfig) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(None)
        .max_lifetime(None)
}

fn is_sqlite_memory(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("sqlite:") && lower.contains(":memory:")
}
