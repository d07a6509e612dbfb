//! Error type shared by the query builder, the database backend and the
//! active-record layer.
//!
//! Backend failures are classified once, when they cross into [`Error`]:
//! a missing table or column becomes [`Error::MissingColumnOrTable`], every
//! other SQLite failure is kept as [`Error::Sqlite`].

use crate::value::ValueExtractionError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, executing or hydrating statements
#[derive(Debug, Error)]
pub enum Error {
    /// The backend reported an unknown table or column
    #[error("Missing column or table: {0}")]
    MissingColumnOrTable(String),

    /// Any other backend failure
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// Unsupported backend/builder kind or an unusable configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration sources could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Execution was requested while the clause buffer is empty
    #[error("There is no statement to execute")]
    NoStatementToExecute,

    /// A result row does not carry the requested column
    #[error("Column '{0}' not found in the row")]
    ColumnNotFound(String),

    /// A column value could not be converted into the requested Rust type
    #[error("Invalid value for column {column}: {source}")]
    InvalidValue {
        column: String,
        #[source]
        source: ValueExtractionError,
    },

    /// The record has no primary key value for an operation that needs one
    #[error("Primary key is required for this operation")]
    PrimaryKeyRequired,

    /// A single-row query returned no rows
    #[error("Record not found (query returned no rows)")]
    RecordNotFound,

    /// A single-row query returned more than one row
    #[error("Expected one row, query returned {0}")]
    TooManyRows(usize),

    /// The transaction was already committed or rolled back
    #[error("Transaction has already been committed or rolled back")]
    TransactionClosed,
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        if is_missing_column_or_table(&message) {
            Error::MissingColumnOrTable(message)
        } else {
            Error::Sqlite(err)
        }
    }
}

/// Check whether a backend message reports an unknown table or column.
///
/// Only the exact SQLite phrasings match, so constraint violations or
/// syntax errors that merely mention a column stay generic.
pub(crate) fn is_missing_column_or_table(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("no such table")
        || message.contains("no such column")
        || message.contains("has no column named")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_is_classified() {
        assert!(is_missing_column_or_table("no such table: users"));
        assert!(is_missing_column_or_table("no such column: nickname"));
        assert!(is_missing_column_or_table("table tests has no column named age"));
    }

    #[test]
    fn test_other_messages_are_not_classified() {
        assert!(!is_missing_column_or_table("UNIQUE constraint failed: tests.name"));
        assert!(!is_missing_column_or_table("near \"SELEC\": syntax error"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidValue {
            column: "age".to_string(),
            source: ValueExtractionError::TypeMismatch {
                expected: "integer".to_string(),
                actual: "text".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for column age: Type mismatch: expected integer, got text"
        );
        assert!(Error::NoStatementToExecute
            .to_string()
            .contains("no statement to execute"));
    }
}
