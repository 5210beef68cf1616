//! Error types for statement loading and lookup.
//!
//! Loading failures (`Pattern`, `Discovery`, `Read`, `Parse`,
//! `DuplicateNamespace`) are fatal to registry construction. Lookup failures
//! (`NotFound`, `MalformedName`) are returned per call and leave the registry
//! untouched.

use std::path::PathBuf;

use crate::parse::ParseError;

/// Error type for the statement registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The namespace or the tag is absent from the registry.
    #[error("statement '{0}' not found")]
    NotFound(String),

    /// The name does not have the `namespace.tag` shape.
    #[error("malformed statement name '{0}': expected 'namespace.tag'")]
    MalformedName(String),

    /// A statement file could not be parsed.
    #[error("failed to parse {origin}: {source}")]
    Parse {
        /// File path, or namespace for in-memory sources.
        origin: String,
        #[source]
        source: ParseError,
    },

    /// The glob pattern itself is malformed.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// The directory walk behind a glob pattern failed.
    #[error("failed to discover statement files under {}: {source}", root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A discovered statement file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two files map to the same namespace and duplicates are rejected.
    #[error("namespace '{namespace}' is defined by both {first} and {second}")]
    DuplicateNamespace {
        namespace: String,
        first: String,
        second: String,
    },
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new MalformedName error.
    pub fn malformed_name<S: Into<String>>(name: S) -> Self {
        Self::MalformedName(name.into())
    }

    /// Create a new Pattern error.
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is a lookup miss rather than a loading failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using the registry Error type.
pub type Result<T> = std::result::Result<T, Error>;
