//! Error types for the backend adapter.

use thiserror::Error;

/// Main error type for backend operations.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Configuration error (invalid connection settings, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed partition/cluster/shard declaration, raised at
    /// DDL-generation time.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A declared option references a column the table does not have.
    #[error("Column '{column}' does not exist on table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Named-placeholder substitution referenced a parameter name that was
    /// not supplied in the parameter mapping.
    #[error("No value supplied for named parameter '{name}'")]
    MissingParameter { name: String },

    /// Error from the underlying client driver, passed through without
    /// retry logic of any kind.
    #[error("Driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        BackendError::Config(message.into())
    }

    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        BackendError::Validation(message.into())
    }

    /// Create an UnknownColumn error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        BackendError::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Wrap an error coming out of the underlying client driver.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        BackendError::Driver(Box::new(err))
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
