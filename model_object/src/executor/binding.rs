//! Parameter binding
//!
//! Each [`Param`] binds as its own PostgreSQL type. Nothing is inferred from
//! the content of a string.

use crate::query_builder::Param;

// Shared by the query and query_scalar binders below
macro_rules! bind_param {
    ($query:expr, $param:expr) => {
        match $param {
            Param::Null => $query.bind(Option::<String>::None),
            Param::Bool(b) => $query.bind(b),
            Param::Int(i) => $query.bind(i),
            Param::Float(f) => $query.bind(f),
            Param::Text(s) => $query.bind(s),
            Param::Uuid(uuid) => $query.bind(uuid),
            Param::Timestamp(ts) => $query.bind(ts),
            Param::Json(value) => $query.bind(sqlx::types::Json(value)),
        }
    };
}

pub(crate) type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;
pub(crate) type PgQueryScalar<'q, O> =
    sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>;

pub(crate) fn bind_all<'q>(mut query: PgQuery<'q>, params: &[Param]) -> PgQuery<'q> {
    for param in params {
        query = bind_param!(query, param.clone());
    }
    query
}

pub(crate) fn bind_all_scalar<'q, O>(
    mut query: PgQueryScalar<'q, O>,
    params: &[Param],
) -> PgQueryScalar<'q, O> {
    for param in params {
        query = bind_param!(query, param.clone());
    }
    query
}
