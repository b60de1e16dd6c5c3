use crate::errors::ExecutorError;
use crate::query_builder::Statement;
use crate::Row;
use async_trait::async_trait;

/// Runs compiled statements against a database.
///
/// Rows come back as JSON objects keyed by column name; aggregate relation
/// columns may arrive either as decoded JSON or as JSON text.
#[async_trait]
pub trait DatabaseExecutor: Send + Sync {
    /// Every row a SELECT produced
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, ExecutorError>;

    /// The single number a COUNT statement produced
    async fn fetch_count(&self, statement: &Statement) -> Result<i64, ExecutorError>;

    /// The `RETURNING` row of an INSERT, if the database sent one back
    async fn insert(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError>;

    /// Rows affected by an UPDATE or DELETE
    async fn execute(&self, statement: &Statement) -> Result<u64, ExecutorError>;
}
