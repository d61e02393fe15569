//! Error types shared by every rowkit crate.
//!
//! Errors fall into four families:
//!
//! - **shape** errors: a record produced values its metadata does not declare
//!   (most shape problems are already rejected at compile time by the `Model`
//!   bound and by taking records as slices);
//! - **consistency** errors: records in one chunk extracted to different
//!   column counts;
//! - **execution** errors: whatever the driver reported, passed through as
//!   [`Error::Connection`] or [`Error::Query`];
//! - **transaction** errors: misuse of a guard or a failed commit.

use std::fmt;

/// Result alias used throughout rowkit.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for all rowkit operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The driver could not reach or talk to the database.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A statement failed to build or was rejected by the database.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A record does not have the shape its metadata describes.
    #[error("invalid record shape: {0}")]
    Shape(String),

    /// Records within one chunk produced different column counts.
    #[error("attribute sizes are inconsistent: expected {expected} columns, found {found}")]
    Consistency {
        /// Column count of the first record in the chunk.
        expected: usize,
        /// Column count of the offending record.
        found: usize,
    },

    /// A transaction guard was used outside of its open state, or commit failed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Invalid configuration (bad DSN, zero chunk size, double install).
    #[error("configuration error: {0}")]
    Config(String),

    /// Several errors reported together by the driver.
    #[error("{}", join_errors(.0))]
    Multiple(Vec<Error>),
}

fn join_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Build a query error of the given kind.
    pub fn query(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Error::Query(QueryError::new(kind, message))
    }

    /// The "no matching row" error drivers report for empty single-row lookups.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::query(QueryErrorKind::NotFound, message)
    }

    /// Whether this error (or any error it aggregates) means no row matched.
    #[must_use]
    pub fn is_record_not_found(&self) -> bool {
        match self {
            Error::Query(q) => q.kind == QueryErrorKind::NotFound,
            Error::Multiple(errors) => errors.iter().any(Error::is_record_not_found),
            _ => false,
        }
    }

    /// Attach the SQL text to a query error; other errors pass through.
    #[must_use]
    pub fn with_sql(self, sql: impl Into<String>) -> Self {
        match self {
            Error::Query(mut q) => {
                if q.sql.is_none() {
                    q.sql = Some(sql.into());
                }
                Error::Query(q)
            }
            other => other,
        }
    }
}

/// Classify an error as "no matching row found".
#[must_use]
pub fn is_record_not_found(err: &Error) -> bool {
    err.is_record_not_found()
}

/// What went wrong while talking to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Establishing the connection failed.
    Connect,
    /// The server rejected our credentials.
    Authentication,
    /// The connection dropped mid-operation.
    Disconnected,
}

impl fmt::Display for ConnectionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionErrorKind::Connect => "connect",
            ConnectionErrorKind::Authentication => "authentication",
            ConnectionErrorKind::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// Connection-level failure reported by a driver.
#[derive(Debug, thiserror::Error)]
#[error("connection error ({kind}): {message}")]
pub struct ConnectionError {
    /// Failure category.
    pub kind: ConnectionErrorKind,
    /// Driver message.
    pub message: String,
    /// Underlying cause, if the driver kept one.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConnectionError {
    /// Create a connection error without a source.
    pub fn new(kind: ConnectionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }
}

/// Category of a statement failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// The statement could not be built.
    Build,
    /// SQL syntax rejected by the server.
    Syntax,
    /// Unique / foreign key / check constraint violation.
    Constraint,
    /// No row matched a single-row lookup.
    NotFound,
    /// Serialization failure or deadlock.
    Conflict,
    /// Anything else the database reported.
    Database,
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryErrorKind::Build => "build",
            QueryErrorKind::Syntax => "syntax",
            QueryErrorKind::Constraint => "constraint",
            QueryErrorKind::NotFound => "record not found",
            QueryErrorKind::Conflict => "conflict",
            QueryErrorKind::Database => "database",
        };
        f.write_str(s)
    }
}

/// Statement-level failure.
#[derive(Debug, thiserror::Error)]
#[error("query error ({kind}): {message}")]
pub struct QueryError {
    /// Failure category.
    pub kind: QueryErrorKind,
    /// Human readable message.
    pub message: String,
    /// SQLSTATE code when the driver reports one.
    pub sqlstate: Option<String>,
    /// Statement text, when known.
    pub sql: Option<String>,
    /// Underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl QueryError {
    /// Create a query error with only a kind and message.
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sqlstate: None,
            sql: None,
            source: None,
        }
    }
}
