//! Statement execution
//!
//! The PostgreSQL implementation of [`DatabaseExecutor`](crate::traits::DatabaseExecutor).

mod binding;
pub mod postgres;

pub use postgres::PgExecutor;
