//! SQL generation
//!
//! Renders a [`QueryState`] into statements with `$n` placeholders. Values
//! never reach the SQL text; identifiers come from the model or were
//! validated by the builder.
//!
//! Writes bind their payload as one `jsonb` object and let the server
//! convert each key to its column type through `jsonb_populate_record`.

use crate::query_builder::filter::{Connector, QueryOperator, WhereClause};
use crate::query_builder::param::Param;
use crate::query_builder::state::{QueryState, TrashedScope};
use crate::schema::ModelSchema;
use serde_json::{Map, Value};

/// SQL text plus the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Collects bound values and hands out their placeholders
#[derive(Debug, Default)]
struct ParamList {
    values: Vec<Param>,
}

impl ParamList {
    /// Nulls are written as literals, so they never carry a guessed type.
    fn push(&mut self, value: Param) -> String {
        if value.is_null() {
            return "NULL".to_string();
        }
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

pub struct SqlGenerator;

impl SqlGenerator {
    /// `SELECT ... FROM ...` with filters, ordering and limits.
    pub fn select(schema: &ModelSchema, state: &QueryState) -> Statement {
        let mut params = ParamList::default();
        let mut sql = format!(
            "SELECT {} FROM {}",
            Self::build_select_clause(state),
            schema.table
        );

        sql.push_str(&Self::build_where_clause(
            schema,
            &state.wheres,
            state.trashed,
            &mut params,
        ));
        sql.push_str(&Self::build_order_clause(state));

        let limit = state.pagination.to_sql();
        if !limit.is_empty() {
            sql.push(' ');
            sql.push_str(&limit);
        }

        Statement::new(sql, params.values)
    }

    /// Row count of the select, ignoring projection, order and limits.
    /// Relations are subqueries of the projection, so they never change it.
    pub fn count(schema: &ModelSchema, state: &QueryState) -> Statement {
        let mut params = ParamList::default();
        let mut sql = format!("SELECT COUNT(*) FROM {}", schema.table);
        sql.push_str(&Self::build_where_clause(
            schema,
            &state.wheres,
            state.trashed,
            &mut params,
        ));

        Statement::new(sql, params.values)
    }

    /// `INSERT ... RETURNING <pk>`; with no columns the row takes every default.
    pub fn insert(schema: &ModelSchema, values: Vec<(&str, Value)>) -> Statement {
        if values.is_empty() {
            return Statement::new(
                format!(
                    "INSERT INTO {} DEFAULT VALUES RETURNING {}",
                    schema.table, schema.primary_key
                ),
                Vec::new(),
            );
        }

        let mut params = ParamList::default();
        let (columns, record) = Self::payload_record(schema, values, &mut params);
        let columns = columns.join(", ");

        Statement::new(
            format!(
                "INSERT INTO {} ({}) SELECT {} FROM {} RETURNING {}",
                schema.table, columns, columns, record, schema.primary_key
            ),
            params.values,
        )
    }

    /// `UPDATE ... SET` over the rows the state selects.
    pub fn update(
        schema: &ModelSchema,
        state: &QueryState,
        assignments: Vec<(&str, Value)>,
    ) -> Statement {
        let mut params = ParamList::default();
        let (columns, record) = Self::payload_record(schema, assignments, &mut params);
        let mut sets: Vec<String> = columns
            .iter()
            .map(|column| format!("{} = (SELECT {} FROM {})", column, column, record))
            .collect();

        if schema.timestamps {
            sets.push("updated_at = NOW()".to_string());
        }

        let mut sql = format!("UPDATE {} SET {}", schema.table, sets.join(", "));
        sql.push_str(&Self::build_where_clause(
            schema,
            &state.wheres,
            state.trashed,
            &mut params,
        ));

        Statement::new(sql, params.values)
    }

    /// Soft delete when the model has a deletion marker, hard delete otherwise.
    pub fn delete(schema: &ModelSchema, state: &QueryState) -> Statement {
        match schema.soft_delete_column {
            Some(column) => {
                Self::set_deletion_marker(schema, state, column, "NOW()", state.trashed)
            }
            None => Self::force_delete(schema, state),
        }
    }

    /// `DELETE FROM`, reaching soft-deleted rows too unless the chain asked
    /// for trashed rows only.
    pub fn force_delete(schema: &ModelSchema, state: &QueryState) -> Statement {
        let scope = match state.trashed {
            TrashedScope::Only => TrashedScope::Only,
            _ => TrashedScope::Include,
        };

        let mut params = ParamList::default();
        let mut sql = format!("DELETE FROM {}", schema.table);
        sql.push_str(&Self::build_where_clause(
            schema,
            &state.wheres,
            scope,
            &mut params,
        ));

        Statement::new(sql, params.values)
    }

    /// Clear the deletion marker of trashed rows. `None` for models without one.
    pub fn restore(schema: &ModelSchema, state: &QueryState) -> Option<Statement> {
        let column = schema.soft_delete_column?;
        Some(Self::set_deletion_marker(
            schema,
            state,
            column,
            "NULL",
            TrashedScope::Only,
        ))
    }

    fn set_deletion_marker(
        schema: &ModelSchema,
        state: &QueryState,
        column: &str,
        value: &str,
        scope: TrashedScope,
    ) -> Statement {
        let mut params = ParamList::default();
        let mut sql = format!("UPDATE {} SET {} = {}", schema.table, column, value);
        sql.push_str(&Self::build_where_clause(
            schema,
            &state.wheres,
            scope,
            &mut params,
        ));

        Statement::new(sql, params.values)
    }

    /// Column names plus `jsonb_populate_record(NULL::<table>, $n)` reading
    /// them from one bound object.
    fn payload_record<'a>(
        schema: &ModelSchema,
        values: Vec<(&'a str, Value)>,
        params: &mut ParamList,
    ) -> (Vec<&'a str>, String) {
        let mut columns = Vec::with_capacity(values.len());
        let mut payload = Map::with_capacity(values.len());
        for (column, value) in values {
            columns.push(column);
            payload.insert(column.to_string(), value);
        }

        let placeholder = params.push(Param::Json(Value::Object(payload)));
        let record = format!(
            "jsonb_populate_record(NULL::{}, {})",
            schema.table, placeholder
        );
        (columns, record)
    }

    fn build_select_clause(state: &QueryState) -> String {
        state
            .projection
            .iter()
            .map(|field| field.to_sql())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Clauses in issue order, then the soft-delete guard appended with AND.
    /// An OR chain is parenthesized first so the guard applies to all of it.
    fn build_where_clause(
        schema: &ModelSchema,
        wheres: &[WhereClause],
        scope: TrashedScope,
        params: &mut ParamList,
    ) -> String {
        let mut conditions = String::new();

        for (i, clause) in wheres.iter().enumerate() {
            if i > 0 {
                conditions.push(' ');
                conditions.push_str(clause.connector.to_sql());
                conditions.push(' ');
            }
            conditions.push_str(&Self::build_condition_sql(clause, params));
        }

        if let Some(guard) = Self::trashed_guard(schema, scope) {
            if conditions.is_empty() {
                conditions = guard;
            } else if wheres.iter().any(|clause| clause.connector == Connector::Or) {
                conditions = format!("({}) AND {}", conditions, guard);
            } else {
                conditions.push_str(" AND ");
                conditions.push_str(&guard);
            }
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions)
        }
    }

    fn build_condition_sql(clause: &WhereClause, params: &mut ParamList) -> String {
        match (&clause.value, clause.operator) {
            (Param::Null, QueryOperator::Eq) => format!("{} IS NULL", clause.column),
            (Param::Null, QueryOperator::Ne) => format!("{} IS NOT NULL", clause.column),
            (value, operator) => format!(
                "{} {} {}",
                clause.column,
                operator.to_sql(),
                params.push(value.clone())
            ),
        }
    }

    fn trashed_guard(schema: &ModelSchema, scope: TrashedScope) -> Option<String> {
        let column = schema.qualified(schema.soft_delete_column?);
        match scope {
            TrashedScope::Exclude => Some(format!("{} IS NULL", column)),
            TrashedScope::Only => Some(format!("{} IS NOT NULL", column)),
            TrashedScope::Include => None,
        }
    }

    fn build_order_clause(state: &QueryState) -> String {
        if state.order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = state
            .order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!(" ORDER BY {}", order_items.join(", "))
    }
}
