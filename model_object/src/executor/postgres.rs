use super::binding::{bind_all, bind_all_scalar};
use crate::errors::ExecutorError;
use crate::query_builder::Statement;
use crate::traits::DatabaseExecutor;
use crate::Row;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// [`DatabaseExecutor`] over a PostgreSQL pool.
///
/// Rows are read through `row_to_json`, so aggregate relation columns are
/// already decoded JSON when they reach the hydrator.
#[derive(Debug, Clone, Default)]
pub struct PgExecutor {
    pool: Option<PgPool>,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// An executor whose every call fails with [`ExecutorError::Unavailable`].
    pub fn unavailable() -> Self {
        Self { pool: None }
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    fn connected_pool(&self) -> Result<&PgPool, ExecutorError> {
        self.pool.as_ref().ok_or(ExecutorError::Unavailable)
    }
}

impl From<PgPool> for PgExecutor {
    fn from(pool: PgPool) -> Self {
        Self::new(pool)
    }
}

fn into_row(value: Value) -> Result<Row, ExecutorError> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(ExecutorError::Decode(format!(
            "expected a JSON object per row, got {}",
            other
        ))),
    }
}

#[async_trait]
impl DatabaseExecutor for PgExecutor {
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, ExecutorError> {
        let pool = self.connected_pool()?;
        let sql = format!(
            "SELECT row_to_json(result_row) FROM ({}) AS result_row",
            statement.sql
        );

        let rows: Vec<Value> = bind_all_scalar(sqlx::query_scalar(&sql), &statement.params)
            .fetch_all(pool)
            .await?;

        rows.into_iter().map(into_row).collect()
    }

    async fn fetch_count(&self, statement: &Statement) -> Result<i64, ExecutorError> {
        let pool = self.connected_pool()?;
        let total: Option<i64> = bind_all_scalar(sqlx::query_scalar(&statement.sql), &statement.params)
            .fetch_one(pool)
            .await?;

        Ok(total.unwrap_or(0))
    }

    async fn insert(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError> {
        let pool = self.connected_pool()?;
        let sql = format!(
            "WITH inserted_row AS ({}) SELECT row_to_json(inserted_row) FROM inserted_row",
            statement.sql
        );

        let row: Option<Value> = bind_all_scalar(sqlx::query_scalar(&sql), &statement.params)
            .fetch_optional(pool)
            .await?;

        row.map(into_row).transpose()
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, ExecutorError> {
        let pool = self.connected_pool()?;
        let result = bind_all(sqlx::query(&statement.sql), &statement.params)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
