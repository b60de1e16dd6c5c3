//! Traits for database operations
//!
//! [`Model`] describes a table; [`DatabaseExecutor`] runs what the query
//! builder compiles for it.

pub mod executor;
pub mod model;

pub use executor::DatabaseExecutor;
pub use model::Model;
