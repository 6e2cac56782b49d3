//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Runner failures always carry the migration name that caused them so the
/// operator surface can report it; nothing is silently swallowed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot reach database: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration ordering violation: {0}")]
    Ordering(String),

    #[error("Migration '{name}' failed: {cause}")]
    Apply { name: String, cause: String },

    #[error("Migration '{name}' cannot be reverted: {reason}")]
    Irreversible { name: String, reason: String },

    #[error("Migration already in progress: {0}")]
    LockContention(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an ordering violation error
    pub fn ordering(msg: impl Into<String>) -> Self {
        Self::Ordering(msg.into())
    }

    /// Create an apply failure for a named migration
    pub fn apply(name: impl Into<String>, cause: impl ToString) -> Self {
        Self::Apply {
            name: name.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_error_carries_name_and_cause() {
        let err = Error::apply("1705600800000-CreateTable", "constraint violation");
        let msg = err.to_string();
        assert!(msg.contains("1705600800000-CreateTable"));
        assert!(msg.contains("constraint violation"));
    }

    #[test]
    fn test_irreversible_error_message() {
        let err = Error::Irreversible {
            name: "RemoveDuplicateProducts".to_string(),
            reason: "rows were permanently deleted".to_string(),
        };
        assert!(err.to_string().contains("cannot be reverted"));
    }
}
