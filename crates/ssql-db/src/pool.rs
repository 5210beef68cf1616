//! Connection pool management for SQLite via r2d2.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open a connection pool for `config`.
///
/// A `:memory:` (or empty) DSN gets a uniquely-named shared-cache in-memory
/// database, so every connection in the pool sees the same data while
/// separate pools stay isolated. Any other DSN is handed to SQLite as-is.
pub fn open_pool(config: &DatabaseConfig) -> Result<DbPool> {
    if !config.is_sqlite() {
        return Err(Error::UnsupportedDriver(config.driver.clone()));
    }
    if config.max_connections == 0 {
        return Err(Error::InvalidConfig(
            "max_connections cannot be 0".to_string(),
        ));
    }
    if config.connection_timeout_ms == 0 {
        return Err(Error::InvalidConfig(
            "connection_timeout_ms cannot be 0".to_string(),
        ));
    }

    let manager = if config.is_memory() {
        SqliteConnectionManager::file(memory_uri())
    } else {
        SqliteConnectionManager::file(&config.dsn)
    };

    let foreign_keys = config.foreign_keys;
    let manager = manager.with_init(move |conn| {
        if foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }
        Ok(())
    });

    let (max_lifetime, idle_timeout) = recycling(config);
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_millis(config.connection_timeout_ms))
        .max_lifetime(max_lifetime)
        .idle_timeout(idle_timeout)
        .build(manager)?;

    debug!(
        "Opened SQLite pool for '{}' ({} connections)",
        config.dsn, config.max_connections
    );
    Ok(pool)
}

/// Open a private in-memory pool with default settings (useful for tests).
pub fn open_memory_pool() -> Result<DbPool> {
    open_pool(&DatabaseConfig::default())
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    Ok(pool.get()?)
}

/// Max lifetime and idle timeout for pooled connections.
///
/// A shared-cache memory database is freed as soon as its last connection
/// closes, and r2d2 closes expired connections before opening replacements,
/// so memory pools never retire connections. File databases keep r2d2's
/// defaults.
fn recycling(config: &DatabaseConfig) -> (Option<Duration>, Option<Duration>) {
    if config.is_memory() {
        (None, None)
    } else {
        (
            Some(Duration::from_secs(30 * 60)),
            Some(Duration::from_secs(10 * 60)),
        )
    }
}

fn memory_uri() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("file:ssql_mem_{}_{n}?mode=memory&cache=shared", std::process::id())
}
