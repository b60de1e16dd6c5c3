//! Bound values
//!
//! A [`Param`] keeps the type the caller gave it. Strings always bind as
//! text; timestamps and UUIDs bind as such only when they arrive typed.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::id_type::ModelId;

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Rendered as a `NULL` literal, never bound
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// Arrays, objects and whole write payloads, bound as `jsonb`
    Json(Value),
}

impl Param {
    pub fn is_null(&self) -> bool {
        matches!(self, Param::Null)
    }

    /// Map a JSON value by its own kind; strings stay text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Param::Null,
            Value::Bool(b) => Param::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Param::Int(i),
                None => n
                    .as_f64()
                    .map(Param::Float)
                    .unwrap_or_else(|| Param::Text(n.to_string())),
            },
            Value::String(s) => Param::Text(s),
            other => Param::Json(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Param::Null => Value::Null,
            Param::Bool(b) => Value::Bool(*b),
            Param::Int(i) => Value::from(*i),
            Param::Float(f) => Value::from(*f),
            Param::Text(s) => Value::String(s.clone()),
            Param::Uuid(uuid) => Value::String(uuid.to_string()),
            Param::Timestamp(ts) => Value::String(ts.to_rfc3339()),
            Param::Json(value) => value.clone(),
        }
    }
}

impl PartialEq<Value> for Param {
    fn eq(&self, other: &Value) -> bool {
        self.to_json() == *other
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::from_json(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Text(value.clone())
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Int(value.into())
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Param::Int(value.into())
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<Uuid> for Param {
    fn from(value: Uuid) -> Self {
        Param::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(value: DateTime<Utc>) -> Self {
        Param::Timestamp(value)
    }
}

impl From<ModelId> for Param {
    fn from(value: ModelId) -> Self {
        match value {
            ModelId::Numeric(id) => Param::Int(id),
            ModelId::Uuid(id) => Param::Uuid(id),
            ModelId::String(id) => Param::Text(id),
        }
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Param::Null)
    }
}
