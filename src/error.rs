// ABOUTME: Error types shared by the connector, reconciler, and reporters
// ABOUTME: Separates connectivity failures from generic query and I/O errors

use crate::postgres::DatabaseRole;
use thiserror::Error;

/// Main error type for comparison operations.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Authentication or connectivity failure while opening a session
    #[error("Connection error ({role} database): {message}")]
    Connection { role: DatabaseRole, message: String },

    /// The password retry budget was exhausted
    #[error("Failed to connect to {role} database after {attempts} attempt(s)")]
    ConnectionEstablishment { role: DatabaseRole, attempts: u32 },

    /// SQL-level failure (missing table, permissions, etc.)
    #[error("{context}: {reason}")]
    Query {
        context: String,
        reason: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal prompt failed or was aborted
    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl CompareError {
    /// Create a Query error with context about which statement failed
    pub fn query(context: impl Into<String>, source: tokio_postgres::Error) -> Self {
        CompareError::Query {
            context: context.into(),
            reason: driver_error_message(&source),
            source,
        }
    }

    /// True for failures that a fresh password attempt could fix
    pub fn is_connection_error(&self) -> bool {
        matches!(self, CompareError::Connection { .. })
    }
}

/// Full text of a driver error
///
/// `tokio_postgres::Error` only displays its kind ("db error", "error
/// connecting to server"); the server message or I/O cause sits behind
/// `as_db_error` and the source chain.
pub(crate) fn driver_error_message(error: &tokio_postgres::Error) -> String {
    if let Some(db) = error.as_db_error() {
        return format!("{}: {}", db.severity(), db.message());
    }

    let mut message = error.to_string();
    let mut cause = std::error::Error::source(error);
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

impl From<dialoguer::Error> for CompareError {
    fn from(e: dialoguer::Error) -> Self {
        CompareError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
