//! Result hydration
//!
//! Turns the aggregate column of each eager relation into the nested value
//! callers see, and drops hidden columns.

use crate::query_builder::state::EagerRelation;
use crate::relation::Cardinality;
use crate::Row;
use serde_json::Value;

pub struct ResultHydrator<'a> {
    eager: &'a [EagerRelation],
    hidden: &'a [&'static str],
}

impl<'a> ResultHydrator<'a> {
    pub fn new(eager: &'a [EagerRelation], hidden: &'a [&'static str]) -> Self {
        Self { eager, hidden }
    }

    pub fn hydrate(&self, rows: Vec<Row>) -> Result<Vec<Row>, String> {
        rows.into_iter().map(|row| self.hydrate_row(row)).collect()
    }

    pub fn hydrate_row(&self, mut row: Row) -> Result<Row, String> {
        for relation in self.eager {
            let packed = row.remove(&relation.column).unwrap_or(Value::Null);
            let related = decode_packed(&relation.column, packed)?;

            let value = match relation.cardinality {
                Cardinality::One => related.into_iter().next().unwrap_or(Value::Null),
                Cardinality::Many => Value::Array(related),
            };
            row.insert(relation.name.clone(), value);
        }

        for column in self.hidden {
            row.remove(*column);
        }

        Ok(row)
    }
}

/// Aggregates arrive as JSON arrays, or as JSON text from drivers that do
/// not decode them.
fn decode_packed(column: &str, packed: Value) -> Result<Vec<Value>, String> {
    match packed {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(other) => Err(format!(
                "column '{}' holds {} instead of a JSON array",
                column,
                kind_of(&other)
            )),
            Err(e) => Err(format!("column '{}' is not valid JSON: {}", column, e)),
        },
        other => Err(format!(
            "column '{}' holds {} instead of a JSON array",
            column,
            kind_of(&other)
        )),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
