//! Query builder
//!
//! Fluent chains, the SQL they compile to, and the hydration of their results.

pub mod builder;
pub mod execution;
pub mod filter;
pub mod hydrate;
pub mod ordering;
pub mod pagination;
pub mod param;
pub mod projection;
pub mod sql_generation;
pub mod state;


#[cfg(test)]
mod integration_tests;

pub use builder::Query;
pub use filter::{Connector, QueryOperator, WhereClause};
pub use hydrate::ResultHydrator;
pub use ordering::SortOrder;
pub use pagination::{PageWindow, Paginated, Pagination};
pub use param::Param;
pub use projection::SelectField;
pub use sql_generation::{SqlGenerator, Statement};
pub use state::{EagerRelation, QueryState, TrashedScope};
