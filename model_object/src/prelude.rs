//! Convenience re-exports for common model-object usage

// Core traits
pub use crate::traits::{DatabaseExecutor, Model};

// Error types
pub use crate::errors::{ExecutorError, ModelError};

// Query building
pub use crate::query_builder::{Paginated, Query, QueryOperator, SortOrder, Statement};

// Relations
pub use crate::relation::{Cardinality, RelationDef};

pub use crate::executor::PgExecutor;
pub use crate::id_type::ModelId;
pub use crate::validation::ValidationError;
pub use crate::Row;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value};
pub use sqlx::PgPool;
pub use uuid::Uuid;
