//! Convenience re-exports for common Lumin usage
//!
//! # Example
//!
//! ```rust
//! use lumin::prelude::*;
//!
//! // Models, the query builder, config and the derive macros are now in scope
//! ```

// Core Lumin components
pub use crate::core::Lumin;
pub use crate::errors::LuminError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PaginationConfig};

// Models, queries, executors and errors
pub use model_object::prelude::*;

// Re-export model_object module for macro-generated code
pub use model_object;

// Derive and attribute macros for model definitions
pub use model_derive::{Model, model};

// Common external dependencies
pub use sqlx;
pub use tokio;
