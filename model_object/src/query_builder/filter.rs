//! Where clauses
//!
//! Clauses are kept in the order they were issued and rendered flat, so
//! `a AND b OR c` means exactly what SQL precedence makes of it.

use crate::query_builder::param::Param;
use crate::validation::ValidationError;
use std::fmt::Display;
use std::str::FromStr;

/// Query condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,      // =
    Ne,      // !=
    Gt,      // >
    Gte,     // >=
    Lt,      // <
    Lte,     // <=
    Like,    // LIKE
    ILike,   // ILIKE (case insensitive)
    NotLike, // NOT LIKE
}

impl QueryOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "=",
            QueryOperator::Ne => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::ILike => "ILIKE",
            QueryOperator::NotLike => "NOT LIKE",
        }
    }
}

impl FromStr for QueryOperator {
    type Err = ValidationError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op.trim().to_ascii_uppercase().as_str() {
            "=" => Ok(QueryOperator::Eq),
            "!=" | "<>" => Ok(QueryOperator::Ne),
            ">" => Ok(QueryOperator::Gt),
            ">=" => Ok(QueryOperator::Gte),
            "<" => Ok(QueryOperator::Lt),
            "<=" => Ok(QueryOperator::Lte),
            "LIKE" => Ok(QueryOperator::Like),
            "ILIKE" => Ok(QueryOperator::ILike),
            "NOT LIKE" => Ok(QueryOperator::NotLike),
            _ => Err(ValidationError::UnknownOperator(op.to_string())),
        }
    }
}

/// How a clause attaches to the ones before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// Single `column <op> value` condition
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub connector: Connector,
    pub column: String,
    pub operator: QueryOperator,
    pub value: Param,
}

impl WhereClause {
    pub fn new(connector: Connector, column: impl Into<String>, operator: QueryOperator, value: Param) -> Self {
        Self {
            connector,
            column: column.into(),
            operator,
            value,
        }
    }

    /// `column LIKE '%value%'`
    pub fn contains(connector: Connector, column: impl Into<String>, needle: impl Display) -> Self {
        Self::new(
            connector,
            column,
            QueryOperator::Like,
            Param::Text(format!("%{}%", needle)),
        )
    }
}
