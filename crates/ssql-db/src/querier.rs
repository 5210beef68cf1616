//! The name-based query capability shared by [`Db`](crate::Db) and
//! [`Tx`](crate::Tx).
//!
//! Implementors supply the registry and a way to lend a connection; every
//! operation is provided on top of [`Querier::run`], which resolves the
//! statement name before any connection is requested.

use rusqlite::{Connection, Params, Row, Rows};
use serde::Serialize;
use ssql_statements::Registry;
use tracing::trace;

use crate::error::{Error, Result};
use crate::named;
use crate::row::FromRow;

/// Outcome of `exec` and `named_exec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Rows changed, inserted or deleted by the statement.
    pub rows_affected: usize,
    /// `last_insert_rowid()` of the connection after the statement ran.
    pub last_insert_rowid: i64,
}

/// Query and exec operations addressed by `namespace.tag`.
pub trait Querier {
    /// The registry statement names resolve against.
    fn statements(&self) -> &Registry;

    /// Run `f` with a connection.
    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>;

    /// Resolve `name` to its SQL text.
    fn sql(&self, name: &str) -> Result<&str> {
        Ok(self.statements().lookup(name)?)
    }

    /// Resolve `name`, then run `f` with a connection and the SQL text.
    fn run<T, F>(&self, name: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Connection, &str) -> Result<T>,
    {
        let sql = self.sql(name)?;
        trace!("Running statement {}", name);
        self.with_conn(|conn| f(conn, sql))
    }

    /// Run a query and hand the row cursor to `f`.
    fn query<P, T, F>(&self, name: &str, params: P, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(Rows<'_>) -> rusqlite::Result<T>,
    {
        self.run(name, |conn, sql| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query(params)?;
            let out = f(rows)?;
            Ok(out)
        })
    }

    /// Run a query and map its first row with `f`.
    ///
    /// No rows is reported as `rusqlite::Error::QueryReturnedNoRows`.
    fn query_row<P, T, F>(&self, name: &str, params: P, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.run(name, |conn, sql| {
            let mut stmt = conn.prepare_cached(sql)?;
            let out = stmt.query_row(params, f)?;
            Ok(out)
        })
    }

    /// Scan the first row into `T`.
    fn get<T, P>(&self, name: &str, params: P) -> Result<T>
    where
        T: FromRow,
        P: Params,
    {
        self.query_row(name, params, T::from_row)
    }

    /// Scan the first row into `T`, or `None` when there are no rows.
    fn get_optional<T, P>(&self, name: &str, params: P) -> Result<Option<T>>
    where
        T: FromRow,
        P: Params,
    {
        match self.get(name, params) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Sqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Scan every row into `T`.
    fn select<T, P>(&self, name: &str, params: P) -> Result<Vec<T>>
    where
        T: FromRow,
        P: Params,
    {
        self.run(name, |conn, sql| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt
                .query_map(params, T::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Execute a statement with positional parameters.
    fn exec<P>(&self, name: &str, params: P) -> Result<ExecResult>
    where
        P: Params,
    {
        self.run(name, |conn, sql| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows_affected = stmt.execute(params)?;
            Ok(ExecResult {
                rows_affected,
                last_insert_rowid: conn.last_insert_rowid(),
            })
        })
    }

    /// Execute a statement, binding its named parameters from the fields of
    /// a serializable struct or map.
    fn named_exec<A>(&self, name: &str, arg: &A) -> Result<ExecResult>
    where
        A: Serialize + ?Sized,
    {
        self.run(name, |conn, sql| {
            let mut stmt = conn.prepare_cached(sql)?;
            named::bind_named(&mut stmt, arg)?;
            let rows_affected = stmt.raw_execute()?;
            Ok(ExecResult {
                rows_affected,
                last_insert_rowid: conn.last_insert_rowid(),
            })
        })
    }
}
