//! Error types for the ORM system
//!
//! Provides error handling for statement binding, adapter configuration,
//! and the underlying database driver.

use thiserror::Error;

/// Result type alias for ORM operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for ORM operations
#[derive(Debug, Clone, Error)]
pub enum OrmError {
    /// A value could not be bound into a prepared statement
    #[error("binding error on '{table}.{column}': {message}")]
    Binding {
        table: String,
        column: String,
        message: String,
    },

    /// The entity type does not support the requested operation
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An operation was attempted in a state that does not allow it
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed table descriptor or adapter metadata
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Error reported by the underlying database driver
    #[error("database error: {0}")]
    Database(String),
}

impl OrmError {
    /// Build a binding error for a specific column of a table.
    pub fn binding(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        OrmError::Binding {
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        OrmError::Database(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for OrmError {
    fn from(err: rusqlite::Error) -> Self {
        OrmError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_error_display() {
        let err = OrmError::binding("users", "name", "cannot bind null to NOT NULL column");
        assert_eq!(
            err.to_string(),
            "binding error on 'users.name': cannot bind null to NOT NULL column"
        );
    }

    #[test]
    fn test_unsupported_operation_display() {
        let err = OrmError::UnsupportedOperation("no autoincrement column on 'tags'".to_string());
        assert!(err.to_string().starts_with("unsupported operation"));
    }
}
