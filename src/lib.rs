//! # Lumin
//!
//! A static-style query builder for PostgreSQL. Models describe a table,
//! every entry point hands out a fresh query chain, and related rows are
//! eager loaded as JSON aggregates in the same statement.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumin::prelude::*;
//!
//! #[model]
//! #[table(name = "posts", soft_delete)]
//! #[has_many(name = "comments", foreign_key = "post_id")]
//! pub struct Post {
//!     #[primary_key]
//!     pub id: i64,
//!
//!     #[field(fillable)]
//!     pub title: String,
//!
//!     #[field(fillable)]
//!     pub status: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let lumin = Lumin::new(config).await?;
//!     let db = lumin.database();
//!
//!     Post::create(db, &json!({ "title": "Hello", "status": "draft" })).await?;
//!
//!     let drafts = Post::where_("status", QueryOperator::Eq, "draft")
//!         .with("comments", &["id", "body"])
//!         .order_by_desc("id")
//!         .get(db)
//!         .await?;
//!     println!("{} drafts", drafts.len());
//!
//!     let page = lumin.paginate(Post::query(), None, 1).await?;
//!     println!("page {} of {}", page.page, page.total_pages);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macro
/// Only compiles to a log call when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::Lumin;
pub use errors::LuminError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, PaginationConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use model_derive;
pub use model_object;

// Re-export external dependencies used in public API
pub use async_trait;
pub use serde_json;
pub use sqlx;
