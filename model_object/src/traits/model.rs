//! Trait definitions
//!
//! The [`Model`] trait describes a table and hands out fresh query chains.

use crate::errors::ModelError;
use crate::id_type::ModelId;
use crate::naming;
use crate::query_builder::pagination::Paginated;
use crate::query_builder::{Param, Query, QueryOperator};
use crate::relation::RelationDef;
use crate::traits::executor::DatabaseExecutor;
use crate::Row;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;

/// A database table and the entry points for querying it.
///
/// Usually derived:
/// ```ignore
/// use lumin::prelude::*;
///
/// #[model]
/// #[table(soft_delete)]
/// #[has_many(name = "comments", table = "comments", foreign_key = "post_id")]
/// pub struct Post {
///     #[primary_key]
///     pub id: i64,
///
///     #[field(fillable)]
///     pub title: String,
///
///     #[field(hidden)]
///     pub secret: Option<String>,
/// }
///
/// let page = Post::where_("status", QueryOperator::Eq, "draft")
///     .with("comments", &["id", "body"])
///     .paginate(&db, 10, 1)
///     .await?;
/// ```
///
/// Every entry point returns a new [`Query`]; chains never share state.
pub trait Model: Sized + 'static {
    /// Table name, derived from the type name unless overridden
    fn table_name() -> String {
        naming::table_name_for::<Self>()
    }

    fn primary_key() -> &'static str {
        "id"
    }

    /// Columns `create` and `update` may write
    fn fillable() -> &'static [&'static str];

    /// Columns stripped from every returned row
    fn hidden() -> &'static [&'static str] {
        &[]
    }

    /// Deletion marker column of soft-deletable models
    fn soft_delete_column() -> Option<&'static str> {
        None
    }

    fn supports_soft_delete() -> bool {
        Self::soft_delete_column().is_some()
    }

    /// Whether updates also set `updated_at`
    fn timestamps() -> bool {
        true
    }

    fn relations() -> &'static [RelationDef] {
        &[]
    }

    fn relation(name: &str) -> Option<&'static RelationDef> {
        Self::relations().iter().find(|relation| relation.name == name)
    }

    fn query() -> Query<Self> {
        Query::new()
    }

    fn select(columns: &[&str]) -> Query<Self> {
        Self::query().select(columns)
    }

    fn where_(column: &str, operator: QueryOperator, value: impl Into<Param>) -> Query<Self> {
        Self::query().where_(column, operator, value)
    }

    fn or_where(column: &str, operator: QueryOperator, value: impl Into<Param>) -> Query<Self> {
        Self::query().or_where(column, operator, value)
    }

    fn where_like(column: &str, value: impl Display) -> Query<Self> {
        Self::query().where_like(column, value)
    }

    fn order_by_asc(column: &str) -> Query<Self> {
        Self::query().order_by_asc(column)
    }

    fn order_by_desc(column: &str) -> Query<Self> {
        Self::query().order_by_desc(column)
    }

    fn with(relation: &str, columns: &[&str]) -> Query<Self> {
        Self::query().with(relation, columns)
    }

    fn with_trashed() -> Query<Self> {
        Self::query().with_trashed()
    }

    fn only_trashed() -> Query<Self> {
        Self::query().only_trashed()
    }

    /// Every live row.
    fn all<E>(db: &E) -> impl Future<Output = Result<Vec<Row>, ModelError>> + Send
    where
        E: DatabaseExecutor + ?Sized,
    {
        Self::query().get(db)
    }

    fn paginate<E>(
        db: &E,
        per_page: u64,
        page: u64,
    ) -> impl Future<Output = Result<Paginated<Row>, ModelError>> + Send
    where
        E: DatabaseExecutor + ?Sized,
    {
        Self::query().paginate(db, per_page, page)
    }

    /// Insert the fillable keys of `data` and read the new row back.
    fn create<E, T>(db: &E, data: &T) -> impl Future<Output = Result<Option<Row>, ModelError>> + Send
    where
        E: DatabaseExecutor + ?Sized,
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(data);
        async move { Self::query().create(db, payload?).await }
    }

    /// Live row with the given primary key, `None` when there is none.
    fn find_by_id<E>(
        db: &E,
        id: impl Into<ModelId>,
    ) -> impl Future<Output = Result<Option<Row>, ModelError>> + Send
    where
        E: DatabaseExecutor + ?Sized,
    {
        Self::query().find(db, id.into())
    }
}
