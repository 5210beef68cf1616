//! The transaction facade.
//!
//! A [`Tx`] owns one pooled connection with an open transaction. `commit` and
//! `rollback` consume it; dropping it without either rolls back.

use std::sync::Arc;

use rusqlite::Connection;
use ssql_statements::Registry;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pool::PooledConnection;
use crate::querier::Querier;

/// SQLite locking behaviour for `BEGIN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Behavior {
    /// Locks are acquired on first read or write.
    #[default]
    Deferred,
    /// A write lock is acquired immediately.
    Immediate,
    /// An exclusive lock is acquired immediately.
    Exclusive,
}

impl Behavior {
    fn begin_sql(self) -> &'static str {
        match self {
            Behavior::Deferred => "BEGIN DEFERRED",
            Behavior::Immediate => "BEGIN IMMEDIATE",
            Behavior::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

/// Name-based access inside one transaction.
pub struct Tx {
    conn: PooledConnection,
    statements: Arc<Registry>,
}

impl std::fmt::Debug for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx")
            .field("autocommit", &self.conn.is_autocommit())
            .field("statements", &self.statements.len())
            .finish()
    }
}

impl Tx {
    pub(crate) fn begin(
        conn: PooledConnection,
        statements: Arc<Registry>,
        behavior: Behavior,
    ) -> Result<Self> {
        conn.execute_batch(behavior.begin_sql())?;
        debug!("Transaction started ({:?})", behavior);
        Ok(Self { conn, statements })
    }

    /// Commit the transaction.
    ///
    /// If `COMMIT` fails the transaction is rolled back when the value is
    /// dropped.
    pub fn commit(self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Roll the transaction back.
    ///
    /// The `Tx` is consumed, so it cannot be used afterwards:
    ///
    /// ```compile_fail
    /// use ssql_db::{pool, Db, OnDuplicate, Querier, Registry};
    ///
    /// let registry =
    ///     Registry::from_sources([("t", "-- name: one\nSELECT 1\n")], OnDuplicate::Reject)
    ///         .unwrap();
    /// let db = Db::new(pool::open_memory_pool().unwrap(), registry);
    ///
    /// let tx = db.begin().unwrap();
    /// tx.rollback().unwrap();
    /// tx.exec("t.one", []).unwrap();
    /// ```
    pub fn rollback(self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        debug!("Transaction rolled back");
        Ok(())
    }

    /// The connection the transaction runs on.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// The registry shared with the `Db` this transaction came from.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.statements
    }
}

impl Querier for Tx {
    fn statements(&self) -> &Registry {
        &self.statements
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.conn)
    }
}

impl Drop for Tx {
    fn drop(&mut self) {
        if self.conn.is_autocommit() {
            return;
        }
        match self.conn.execute_batch("ROLLBACK") {
            Ok(()) => debug!("Unfinished transaction rolled back on drop"),
            Err(e) => warn!("Failed to roll back dropped transaction: {}", e),
        }
    }
}
