//! ssql-statements: named SQL statement files and their registry.
//!
//! Statement files are discovered with a glob pattern; each file becomes a
//! namespace (its file name up to the first `.`) holding tagged SQL blocks.
//! Callers resolve statements with a dotted `namespace.tag` name.
//!
//! # Modules
//!
//! - `parse` - Statement file format and parser
//! - `glob` - Glob pattern discovery over the filesystem
//! - `registry` - The namespace → tag → SQL registry and lookup
//! - `error` - Loading and lookup errors
//!
//! # Example
//!
//! ```
//! use ssql_statements::{OnDuplicate, Registry};
//!
//! let registry = Registry::from_sources(
//!     [("users", "-- name: get_by_id\nSELECT * FROM users WHERE id = ?\n")],
//!     OnDuplicate::Reject,
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     registry.lookup("users.get_by_id").unwrap(),
//!     "SELECT * FROM users WHERE id = ?"
//! );
//! assert!(registry.lookup("users.missing").is_err());
//! ```

pub mod error;
pub mod glob;
pub mod parse;
pub mod registry;

pub use error::{Error, Result};
pub use glob::{discover, Glob};
pub use parse::{ParseError, StatementFile};
pub use registry::{namespace_of, split_name, OnDuplicate, Registry};
