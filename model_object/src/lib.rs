//! Model Object - query building core for Lumin
//!
//! This crate provides the [`Model`] trait, the fluent [`Query`] builder with
//! relation eager loading, soft delete and pagination, and the executor seam
//! the compiled statements run through.

pub mod errors;
pub mod executor;
pub mod id_type;
pub mod naming;
pub mod prelude;
pub mod query_builder;
pub mod relation;
pub mod schema;
pub mod traits;
pub mod validation;

pub use errors::{ExecutorError, ModelError};
pub use executor::PgExecutor;
pub use id_type::ModelId;
pub use query_builder::{Paginated, Param, Query, QueryOperator, SortOrder, Statement};
pub use relation::{Cardinality, RelationDef};
pub use schema::ModelSchema;
pub use traits::*;
pub use validation::{ValidatedColumnRef, ValidatedTableName, ValidationError};

/// A result row: column name to value
pub type Row = serde_json::Map<String, serde_json::Value>;
