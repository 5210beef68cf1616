//! ssql-db: call SQL by name over SQLite.
//!
//! [`Db`] wraps an r2d2 pool of rusqlite connections together with a
//! [`Registry`] of named statements. Every operation takes a
//! `namespace.tag` name, resolves it, and hands the SQL text and arguments to
//! rusqlite unchanged. [`Tx`] offers the same operations inside a
//! transaction and shares the parent's registry.
//!
//! # Modules
//!
//! - `querier` - The shared operation set (`query`, `get`, `select`, `exec`, ...)
//! - `db` - Pool-backed facade
//! - `tx` - Transaction-backed facade
//! - `pool` - Connection pool setup
//! - `config` - Database and statement loading settings
//! - `row` - Row scanning via [`FromRow`]
//!
//! # Example
//!
//! ```
//! use ssql_db::{pool, Db, OnDuplicate, Querier, Registry};
//!
//! let registry = Registry::from_sources(
//!     [(
//!         "users",
//!         "-- name: create\nCREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)\n\
//!          -- name: insert\nINSERT INTO users (name) VALUES (?)\n\
//!          -- name: get_by_id\nSELECT id, name FROM users WHERE id = ?\n",
//!     )],
//!     OnDuplicate::Reject,
//! )
//! .unwrap();
//!
//! let db = Db::new(pool::open_memory_pool().unwrap(), registry);
//! db.exec("users.create", []).unwrap();
//! db.exec("users.insert", ["ada"]).unwrap();
//!
//! let (id, name): (i64, String) = db.get("users.get_by_id", [1]).unwrap();
//! assert_eq!((id, name.as_str()), (1, "ada"));
//! ```

pub mod config;
pub mod db;
pub mod error;
mod named;
pub mod pool;
pub mod querier;
pub mod row;
pub mod tx;

pub use config::{DatabaseConfig, StatementsConfig};
pub use db::Db;
pub use error::{Error, Result};
pub use pool::DbPool;
pub use querier::{ExecResult, Querier};
pub use row::FromRow;
pub use tx::{Behavior, Tx};

pub use ssql_statements::{OnDuplicate, Registry};
