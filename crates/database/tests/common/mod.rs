use database::{AnyPool, PoolConfig, connect, run_migrations};

/// A fresh, migrated in-memory store. One connection: each SQLite memory
/// connection is a separate database.
pub async fn test_pool() -> AnyPool {
    let config = PoolConfig {
        max_connections: 1,
        ..PoolConfig::default()
    };
    let pool = connect("sqlite::memory:", &config)
        .await
        .expect("in-memory database should open");
    run_migrations(&pool).await.expect("migrations should apply");
    pool
}
