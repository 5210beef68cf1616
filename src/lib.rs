//! ssql - call SQL by name
//!
//! Statement files are loaded into a registry of `namespace.tag` names and
//! executed through a thin facade over SQLite. This crate ties the
//! libraries together with file-based configuration and JSON output for the
//! `ssql` command-line tool.

pub mod config;
pub mod output;

pub use ssql_db::{
    Behavior, DatabaseConfig, Db, Error, ExecResult, FromRow, OnDuplicate, Querier, Registry,
    Result, StatementsConfig, Tx,
};
pub use ssql_statements::{ParseError, StatementFile};
