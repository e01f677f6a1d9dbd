use crate::error::DbError;
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::AnyPool;
use std::time::Duration;

/// Tuning knobs for the connection pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Establishes a connection pool to the relational store.
///
/// The driver is picked from the URL scheme: `postgres://` in production,
/// `sqlite::memory:` in the test suites. Note that every in-memory SQLite
/// connection is its own database, so callers using one must cap the pool
/// at a single connection.
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<AnyPool, DbError> {
    if database_url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database URL must not be empty".to_string(),
        ));
    }

    install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        // Keep connections around: an in-memory store dies with its connection.
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Database connected");
    Ok(pool)
}

/// Applies the embedded migrations: the `banks` and `branches` tables and the
/// read-only `bank_branches` view.
pub async fn run_migrations(pool: &AnyPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Closes every pooled connection; used on graceful shutdown.
pub async fn disconnect(pool: &AnyPool) {
    pool.close().await;
    tracing::info!("Database disconnected");
}
