//! The database facade: a connection pool plus the statement registry.

use std::sync::Arc;

use rusqlite::Connection;
use ssql_statements::Registry;
use tracing::info;

use crate::config::{DatabaseConfig, StatementsConfig};
use crate::error::Result;
use crate::pool::{self, DbPool};
use crate::querier::Querier;
use crate::tx::{Behavior, Tx};

/// Name-based access to a pooled SQLite database.
///
/// Every [`Querier`] call checks a connection out of the pool for the
/// duration of that call. Cloning is cheap; clones share the pool and the
/// registry.
#[derive(Clone)]
pub struct Db {
    pool: DbPool,
    statements: Arc<Registry>,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("pool", &self.pool.state())
            .field("statements", &self.statements.len())
            .finish()
    }
}

impl Db {
    /// Load statements matching `pattern`, then open `dsn` with `driver`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ssql_db::{Db, Querier};
    ///
    /// let db = Db::open("sqlite", "/var/lib/app/app.db", "sql/**/*.sql").unwrap();
    /// let (name,): (String,) = db.get("users.get_by_id", [42]).unwrap();
    /// println!("user 42 is {name}");
    /// ```
    pub fn open(driver: &str, dsn: &str, pattern: &str) -> Result<Self> {
        Self::connect(
            &DatabaseConfig::new(driver, dsn),
            &StatementsConfig::new(pattern),
        )
    }

    /// Load statements and open the pool from configuration.
    ///
    /// Statements are loaded first; a loading failure means no pool is
    /// opened.
    pub fn connect(database: &DatabaseConfig, statements: &StatementsConfig) -> Result<Self> {
        let registry = Registry::load_with(&statements.pattern, statements.on_duplicate)?;
        let pool = pool::open_pool(database)?;

        info!(
            "Opened {} with {} named statement(s)",
            database.dsn,
            registry.len()
        );
        Ok(Self::new(pool, registry))
    }

    /// Wrap an existing pool and registry.
    pub fn new(pool: DbPool, statements: impl Into<Arc<Registry>>) -> Self {
        Self {
            pool,
            statements: statements.into(),
        }
    }

    /// Begin a deferred transaction.
    pub fn begin(&self) -> Result<Tx> {
        self.begin_with(Behavior::Deferred)
    }

    /// Begin a transaction with the given locking behaviour.
    ///
    /// The transaction holds one pooled connection until it is committed,
    /// rolled back or dropped.
    pub fn begin_with(&self, behavior: Behavior) -> Result<Tx> {
        let conn = self.pool.get()?;
        Tx::begin(conn, Arc::clone(&self.statements), behavior)
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.statements
    }
}

impl Querier for Db {
    fn statements(&self) -> &Registry {
        &self.statements
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.pool.get()?;
        f(&conn)
    }
}
