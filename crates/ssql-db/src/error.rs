//! Error type for the database facade.
//!
//! Statement lookup errors and rusqlite errors are carried transparently so
//! callers can match on the original value.

/// Error type for `Db` and `Tx` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Statement registry error (lookup miss, malformed name, loading failure).
    #[error(transparent)]
    Statement(#[from] ssql_statements::Error),

    /// Error raised by SQLite, passed through unchanged.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Building the pool or checking out a connection failed.
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A pool setting r2d2 would reject.
    #[error("Invalid database config: {0}")]
    InvalidConfig(String),

    /// The configured driver is not one this crate can open.
    #[error("Unsupported database driver '{0}' (expected 'sqlite')")]
    UnsupportedDriver(String),

    /// The argument to a named-parameter call is not a struct or map, or the
    /// statement uses positional parameters.
    #[error("Invalid named argument: {0}")]
    NamedArgument(String),

    /// A named parameter in the statement has no matching field.
    #[error("No value for named parameter {0}")]
    MissingParameter(String),
}

impl Error {
    /// Create a new NamedArgument error.
    pub fn named_argument<S: Into<String>>(msg: S) -> Self {
        Self::NamedArgument(msg.into())
    }

    /// Whether the statement name did not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Statement(e) if e.is_not_found())
    }

    /// Whether a single-row query returned no rows.
    pub fn no_rows(&self) -> bool {
        matches!(self, Self::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}

/// Result type alias using the facade Error type.
pub type Result<T> = std::result::Result<T, Error>;
