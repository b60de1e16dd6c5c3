//! Error types for the Lumin crate
//!
//! Model operations report [`ModelError`]; this type wraps it together with
//! the setup failures of the coordinator.

use model_object::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LuminError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}
