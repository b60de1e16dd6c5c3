//! Id Type module
//!
//! Primary-key values accepted by `find_by_id` and recovered from `RETURNING` rows.

use serde_json::Value;
use std::fmt::{self, Display};
use uuid::Uuid;

/// Primary-key value: numeric, UUID or free-form string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelId {
    Numeric(i64),
    Uuid(Uuid),
    String(String),
}

impl ModelId {
    /// Recover a key from a `RETURNING` row. `row_to_json` writes `uuid`
    /// columns as strings, so a key string in UUID form reads back as one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ModelId::Numeric),
            Value::String(s) => Some(match Uuid::parse_str(s) {
                Ok(uuid) => ModelId::Uuid(uuid),
                Err(_) => ModelId::String(s.clone()),
            }),
            _ => None,
        }
    }
}

impl Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelId::Numeric(n) => write!(f, "{}", n),
            ModelId::Uuid(uuid) => write!(f, "{}", uuid),
            ModelId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for ModelId {
    fn from(id: i32) -> Self {
        ModelId::Numeric(id as i64)
    }
}

impl From<i64> for ModelId {
    fn from(id: i64) -> Self {
        ModelId::Numeric(id)
    }
}

impl From<u32> for ModelId {
    fn from(id: u32) -> Self {
        ModelId::Numeric(id as i64)
    }
}

impl From<Uuid> for ModelId {
    fn from(id: Uuid) -> Self {
        ModelId::Uuid(id)
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        ModelId::String(id)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        ModelId::String(id.to_string())
    }
}
