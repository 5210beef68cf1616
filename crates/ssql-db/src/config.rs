//! Database and statement loading configuration.
//!
//! Both sections deserialize with every field optional, so an empty table is
//! valid and yields an in-memory database with statements under `sql/`.

use serde::{Deserialize, Serialize};
use ssql_statements::OnDuplicate;

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Driver name. Only `sqlite` (alias `sqlite3`) is supported.
    pub driver: String,

    /// Database path, `file:` URI, or `:memory:`.
    pub dsn: String,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// How long to wait for a pooled connection, in milliseconds.
    pub connection_timeout_ms: u64,

    /// Run `PRAGMA foreign_keys = ON` on every new connection.
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: "sqlite".to_string(),
            dsn: ":memory:".to_string(),
            max_connections: 4,
            connection_timeout_ms: 30_000,
            foreign_keys: true,
        }
    }
}

impl DatabaseConfig {
    /// Config for `driver` and `dsn` with default pool settings.
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            ..Self::default()
        }
    }

    /// Whether `driver` names SQLite.
    pub fn is_sqlite(&self) -> bool {
        matches!(self.driver.as_str(), "sqlite" | "sqlite3")
    }

    /// Whether the DSN asks for a private in-memory database.
    pub fn is_memory(&self) -> bool {
        self.dsn.is_empty() || self.dsn == ":memory:"
    }
}

/// Where statement files live and how duplicates are handled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatementsConfig {
    /// Glob pattern for statement files.
    pub pattern: String,

    /// Policy for two files sharing a namespace.
    pub on_duplicate: OnDuplicate,
}

impl Default for StatementsConfig {
    fn default() -> Self {
        Self {
            pattern: "sql/**/*.sql".to_string(),
            on_duplicate: OnDuplicate::default(),
        }
    }
}

impl StatementsConfig {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }
}
