//! Fluent query chains
//!
//! A [`Query`] owns its [`QueryState`]. Builder methods take the query by
//! value and hand it back; terminal operations consume it.

use crate::query_builder::filter::{Connector, QueryOperator, WhereClause};
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::param::Param;
use crate::query_builder::projection::SelectField;
use crate::query_builder::sql_generation::{SqlGenerator, Statement};
use crate::query_builder::state::{EagerRelation, QueryState, TrashedScope};
use crate::schema::ModelSchema;
use crate::traits::Model;
use crate::validation::{
    validate_identifier, ValidatedColumnRef, ValidatedTableName, ValidationError,
};
use std::fmt::{self, Display};
use std::marker::PhantomData;

pub struct Query<M: Model> {
    pub(crate) schema: ModelSchema,
    pub(crate) state: QueryState,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Query<M> {
    pub fn new() -> Self {
        let schema = ModelSchema::of::<M>();
        let mut state = QueryState::new();
        // Hand-written table_name() overrides skip the derive's checks
        if let Err(e) = ValidatedTableName::new(&schema.table) {
            state.record_error(e);
        }

        Self {
            schema,
            state,
            _model: PhantomData,
        }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Replace the projection. Relation aggregates added by `with` stay.
    pub fn select(mut self, columns: &[&str]) -> Self {
        let mut projection: Vec<SelectField> = Vec::with_capacity(columns.len());
        for column in columns {
            if let Some(column) = self.column_ref(column) {
                projection.push(SelectField::Column(column));
            }
        }
        if projection.is_empty() {
            projection.push(SelectField::All);
        }

        let aggregates = self
            .state
            .projection
            .drain(..)
            .filter(SelectField::is_aggregate);
        projection.extend(aggregates);

        self.state.projection = projection;
        self
    }

    pub fn where_(self, column: &str, operator: QueryOperator, value: impl Into<Param>) -> Self {
        self.push_where(Connector::And, column, operator, value.into())
    }

    pub fn or_where(self, column: &str, operator: QueryOperator, value: impl Into<Param>) -> Self {
        self.push_where(Connector::Or, column, operator, value.into())
    }

    /// `column LIKE '%value%'`, joined with AND
    pub fn where_like(self, column: &str, value: impl Display) -> Self {
        self.push_like(Connector::And, column, value)
    }

    /// `column LIKE '%value%'`, joined with OR
    pub fn or_where_like(self, column: &str, value: impl Display) -> Self {
        self.push_like(Connector::Or, column, value)
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.push_order(column, SortOrder::Asc)
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.push_order(column, SortOrder::Desc)
    }

    /// Eager load a relation declared in `M::relations()`.
    ///
    /// The related rows (only `columns` of them, or whole rows when empty)
    /// come back packed under the relation name: one object or `null` for
    /// `has_one`, a list for `has_many`. Columns the relation marks hidden
    /// are never packed.
    pub fn with(mut self, relation: &str, columns: &[&str]) -> Self {
        let Some(definition) = M::relation(relation) else {
            self.state.record_error(ValidationError::UnknownRelation {
                model: self.schema.model.to_string(),
                relation: relation.to_string(),
            });
            return self;
        };

        let resolved = definition.resolve(&self.schema.table);
        if self
            .state
            .eager
            .iter()
            .any(|eager| eager.column == resolved.related_table || eager.name == resolved.name)
        {
            self.state
                .record_error(ValidationError::DuplicateRelation(resolved.related_table));
            return self;
        }

        for column in columns.iter().chain(definition.hidden) {
            if let Err(e) = validate_identifier(column) {
                self.state.record_error(e);
                return self;
            }
        }

        let packed_columns = if columns.is_empty() {
            None
        } else {
            Some(
                columns
                    .iter()
                    .filter(|column| !definition.is_hidden(column))
                    .map(|column| column.to_string())
                    .collect(),
            )
        };

        if self.state.is_default_projection() {
            self.state.projection = vec![SelectField::column(self.schema.qualified("*"))];
        }
        self.state.projection.push(SelectField::RelationAggregate {
            related_table: resolved.related_table.clone(),
            columns: packed_columns,
            excluded: definition.hidden.iter().map(|c| c.to_string()).collect(),
            condition: resolved.condition,
        });

        self.state.eager.push(EagerRelation {
            name: resolved.name,
            column: resolved.related_table,
            cardinality: resolved.cardinality,
        });
        self
    }

    /// Include soft-deleted rows.
    pub fn with_trashed(mut self) -> Self {
        self.state.trashed = TrashedScope::Include;
        self
    }

    /// Only soft-deleted rows.
    pub fn only_trashed(mut self) -> Self {
        self.state.trashed = TrashedScope::Only;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.state.pagination = self.state.pagination.with_limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.state.pagination = self.state.pagination.with_offset(offset);
        self
    }

    /// The SELECT this chain would run.
    pub fn to_statement(&self) -> Result<Statement, ValidationError> {
        self.state.check()?;
        Ok(SqlGenerator::select(&self.schema, &self.state))
    }

    /// The COUNT pagination would run.
    pub fn to_count_statement(&self) -> Result<Statement, ValidationError> {
        self.state.check()?;
        Ok(SqlGenerator::count(&self.schema, &self.state))
    }

    /// Give up the chain. Terminal operations start here, so the state is
    /// gone once they return, whatever the outcome.
    pub(crate) fn into_parts(self) -> (ModelSchema, QueryState) {
        (self.schema, self.state)
    }

    fn push_where(
        mut self,
        connector: Connector,
        column: &str,
        operator: QueryOperator,
        value: Param,
    ) -> Self {
        if let Some(column) = self.column_ref(column) {
            self.state
                .wheres
                .push(WhereClause::new(connector, column, operator, value));
        }
        self
    }

    fn push_like(mut self, connector: Connector, column: &str, value: impl Display) -> Self {
        if let Some(column) = self.column_ref(column) {
            self.state
                .wheres
                .push(WhereClause::contains(connector, column, value));
        }
        self
    }

    fn push_order(mut self, column: &str, order: SortOrder) -> Self {
        if let Some(column) = self.column_ref(column) {
            self.state.order_by.push((column, order));
        }
        self
    }

    fn column_ref(&mut self, column: &str) -> Option<String> {
        match ValidatedColumnRef::new(column) {
            Ok(column) => Some(column.into_string()),
            Err(e) => {
                self.state.record_error(e);
                None
            }
        }
    }
}

impl<M: Model> Default for Query<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            state: self.state.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("model", &self.schema.model)
            .field("table", &self.schema.table)
            .field("state", &self.state)
            .finish()
    }
}
