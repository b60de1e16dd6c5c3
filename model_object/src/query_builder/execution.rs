//! Terminal operations
//!
//! Each one consumes the [`Query`], compiles it, runs it through a
//! [`DatabaseExecutor`] and hydrates what comes back.

use crate::errors::{ExecutorError, ModelError};
use crate::id_type::ModelId;
use crate::query_builder::builder::Query;
use crate::query_builder::filter::QueryOperator;
use crate::query_builder::hydrate::{kind_of, ResultHydrator};
use crate::query_builder::pagination::{PageWindow, Paginated};
use crate::query_builder::sql_generation::{SqlGenerator, Statement};
use crate::query_builder::state::QueryState;
use crate::schema::ModelSchema;
use crate::traits::{DatabaseExecutor, Model};
use crate::validation::ValidationError;
use crate::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

impl<M: Model> Query<M> {
    /// Every matching row, relations hydrated.
    pub async fn get<E>(self, db: &E) -> Result<Vec<Row>, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;

        let statement = SqlGenerator::select(&schema, &state);
        let rows = fetch_rows(db, &schema, "get", &statement).await?;
        hydrate(&schema, &state, rows)
    }

    /// Matching rows deserialized into `T`.
    pub async fn get_as<T, E>(self, db: &E) -> Result<Vec<T>, ModelError>
    where
        T: DeserializeOwned,
        E: DatabaseExecutor + ?Sized,
    {
        let rows = self.get(db).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(ModelError::from))
            .collect()
    }

    pub async fn first<E>(self, db: &E) -> Result<Option<Row>, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let rows = self.limit(1).get(db).await?;
        Ok(rows.into_iter().next())
    }

    /// First row whose primary key equals `id`.
    pub async fn find<E>(self, db: &E, id: ModelId) -> Result<Option<Row>, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let column = self.schema.qualified(self.schema.primary_key);
        self.where_(&column, QueryOperator::Eq, id)
            .first(db)
            .await
    }

    /// Number of matching rows.
    pub async fn count<E>(self, db: &E) -> Result<u64, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;

        let statement = SqlGenerator::count(&schema, &state);
        fetch_total(db, &schema, "count", &statement).await
    }

    /// One page of matching rows.
    ///
    /// `page` below 1 reads as 1 and past the end clamps to the last page.
    /// An empty result skips the data query and reports page 0.
    pub async fn paginate<E>(
        self,
        db: &E,
        per_page: u64,
        page: u64,
    ) -> Result<Paginated<Row>, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, mut state) = self.into_parts();
        state.check()?;
        if per_page == 0 {
            return Err(ValidationError::InvalidPageSize.into());
        }

        let count = SqlGenerator::count(&schema, &state);
        let total = fetch_total(db, &schema, "paginate", &count).await?;

        let window = PageWindow::compute(total, per_page, page)?;
        if window.is_empty() {
            tracing::debug!(table = %schema.table, "no rows to paginate");
            return Ok(Paginated::new(window, Vec::new()));
        }

        state.pagination = window.pagination();
        let statement = SqlGenerator::select(&schema, &state);
        let rows = fetch_rows(db, &schema, "paginate", &statement).await?;
        let rows = hydrate(&schema, &state, rows)?;

        Ok(Paginated::new(window, rows))
    }

    /// Insert `payload` and read the stored row back by its new key.
    pub(crate) async fn create<E>(self, db: &E, payload: Value) -> Result<Option<Row>, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;
        let values = fillable_values(&schema, payload)?;

        let statement = SqlGenerator::insert(&schema, values);
        log_statement(&schema, "create", &statement);
        let returned = db
            .insert(&statement)
            .await
            .map_err(|e| execution_error(&schema, "create", e))?;

        let id = returned
            .as_ref()
            .and_then(|row| row.get(schema.primary_key))
            .and_then(ModelId::from_value);

        match id {
            Some(id) => Query::<M>::new().find(db, id).await,
            None => {
                tracing::warn!(
                    table = %schema.table,
                    primary_key = schema.primary_key,
                    "insert did not return a usable primary key"
                );
                Ok(None)
            }
        }
    }

    /// Write the fillable keys of `data` to every matching row.
    pub async fn update<E, T>(self, db: &E, data: &T) -> Result<u64, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
        T: Serialize + Sync + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;

        let values = fillable_values(&schema, serde_json::to_value(data)?)?;
        if values.is_empty() {
            return Err(ValidationError::NothingToUpdate(schema.table.clone()).into());
        }

        let statement = SqlGenerator::update(&schema, &state, values);
        execute(db, &schema, "update", &statement).await
    }

    /// Soft delete matching rows, or remove them when the model has no
    /// deletion marker.
    pub async fn delete<E>(self, db: &E) -> Result<u64, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;

        let statement = SqlGenerator::delete(&schema, &state);
        execute(db, &schema, "delete", &statement).await
    }

    /// Remove matching rows, soft-deleted ones included.
    pub async fn force_delete<E>(self, db: &E) -> Result<u64, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;

        let statement = SqlGenerator::force_delete(&schema, &state);
        execute(db, &schema, "force_delete", &statement).await
    }

    /// Bring matching soft-deleted rows back.
    pub async fn restore<E>(self, db: &E) -> Result<u64, ModelError>
    where
        E: DatabaseExecutor + ?Sized,
    {
        let (schema, state) = self.into_parts();
        state.check()?;

        match SqlGenerator::restore(&schema, &state) {
            Some(statement) => execute(db, &schema, "restore", &statement).await,
            None => {
                tracing::debug!(table = %schema.table, "model has no soft delete column, nothing to restore");
                Ok(0)
            }
        }
    }
}

/// Fillable columns present in `payload`, in declaration order.
fn fillable_values(
    schema: &ModelSchema,
    payload: Value,
) -> Result<Vec<(&'static str, Value)>, ModelError> {
    let mut data = match payload {
        Value::Object(data) => data,
        other => return Err(ValidationError::ExpectedObject(kind_of(&other).to_string()).into()),
    };

    let mut values = Vec::with_capacity(schema.fillable.len());
    for column in schema.fillable {
        if let Some(value) = data.remove(*column) {
            values.push((*column, value));
        }
    }

    if !data.is_empty() {
        let dropped: Vec<&String> = data.keys().collect();
        tracing::debug!(table = %schema.table, ?dropped, "ignoring columns that are not fillable");
    }

    Ok(values)
}

fn hydrate(schema: &ModelSchema, state: &QueryState, rows: Vec<Row>) -> Result<Vec<Row>, ModelError> {
    ResultHydrator::new(&state.eager, schema.hidden)
        .hydrate(rows)
        .map_err(|message| ModelError::hydration(&schema.table, message))
}

async fn fetch_rows<E>(
    db: &E,
    schema: &ModelSchema,
    operation: &'static str,
    statement: &Statement,
) -> Result<Vec<Row>, ModelError>
where
    E: DatabaseExecutor + ?Sized,
{
    log_statement(schema, operation, statement);
    db.fetch_all(statement)
        .await
        .map_err(|e| execution_error(schema, operation, e))
}

async fn fetch_total<E>(
    db: &E,
    schema: &ModelSchema,
    operation: &'static str,
    statement: &Statement,
) -> Result<u64, ModelError>
where
    E: DatabaseExecutor + ?Sized,
{
    log_statement(schema, operation, statement);
    let total = db
        .fetch_count(statement)
        .await
        .map_err(|e| execution_error(schema, operation, e))?;

    Ok(u64::try_from(total).unwrap_or(0))
}

async fn execute<E>(
    db: &E,
    schema: &ModelSchema,
    operation: &'static str,
    statement: &Statement,
) -> Result<u64, ModelError>
where
    E: DatabaseExecutor + ?Sized,
{
    log_statement(schema, operation, statement);
    let affected = db
        .execute(statement)
        .await
        .map_err(|e| execution_error(schema, operation, e))?;

    tracing::debug!(table = %schema.table, operation, affected, "statement applied");
    Ok(affected)
}

fn log_statement(schema: &ModelSchema, operation: &'static str, statement: &Statement) {
    tracing::debug!(table = %schema.table, operation, sql = %statement.sql, "executing statement");

    #[cfg(feature = "debug-logging")]
    tracing::trace!(table = %schema.table, operation, params = ?statement.params, "statement parameters");
}

fn execution_error(schema: &ModelSchema, operation: &'static str, error: ExecutorError) -> ModelError {
    tracing::warn!(table = %schema.table, operation, error = %error, "statement failed");
    ModelError::query_execution(&schema.table, operation, error)
}
