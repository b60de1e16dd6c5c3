use crate::validation::ValidationError;
use thiserror::Error;

/// Failures raised by a [`DatabaseExecutor`](crate::traits::DatabaseExecutor).
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("No database connection is available")]
    Unavailable,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Could not decode row: {0}")]
    Decode(String),
}

/// Errors returned by terminal query operations.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("No database connection is available")]
    ConnectionUnavailable,

    #[error("{operation} on '{table}' failed: {source}")]
    QueryExecution {
        table: String,
        operation: &'static str,
        #[source]
        source: ExecutorError,
    },

    #[error("Could not hydrate rows of '{table}': {message}")]
    Hydration { table: String, message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    /// Wrap an executor failure with the table and operation it came from.
    ///
    /// A missing connection is reported as [`ModelError::ConnectionUnavailable`]
    /// regardless of the operation.
    pub fn query_execution(table: &str, operation: &'static str, source: ExecutorError) -> Self {
        match source {
            ExecutorError::Unavailable => ModelError::ConnectionUnavailable,
            source => ModelError::QueryExecution {
                table: table.to_string(),
                operation,
                source,
            },
        }
    }

    pub fn hydration(table: &str, message: impl Into<String>) -> Self {
        ModelError::Hydration {
            table: table.to_string(),
            message: message.into(),
        }
    }
}
