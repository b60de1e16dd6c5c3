use crate::relation::RELATED_ALIAS;

/// A single entry of the SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectField {
    /// `*`
    All,
    /// `column`, `table.column` or `table.*`
    Column(String),
    /// Related rows packed into one JSON array column named after the
    /// related table, computed by a subquery per parent row
    RelationAggregate {
        related_table: String,
        /// `None` packs whole rows
        columns: Option<Vec<String>>,
        /// Dropped from whole rows
        excluded: Vec<String>,
        condition: String,
    },
}

impl SelectField {
    pub fn column(column: impl Into<String>) -> Self {
        SelectField::Column(column.into())
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, SelectField::RelationAggregate { .. })
    }

    pub fn to_sql(&self) -> String {
        match self {
            SelectField::All => "*".to_string(),
            SelectField::Column(column) => column.clone(),
            SelectField::RelationAggregate {
                related_table,
                columns,
                excluded,
                condition,
            } => {
                let packed = match columns {
                    Some(columns) => {
                        let pairs = columns
                            .iter()
                            .map(|column| format!("'{}', {}.{}", column, RELATED_ALIAS, column))
                            .collect::<Vec<_>>()
                            .join(", ");
                        format!("jsonb_build_object({})", pairs)
                    }
                    None => excluded.iter().fold(
                        format!("to_jsonb({})", RELATED_ALIAS),
                        |packed, column| format!("{} - '{}'", packed, column),
                    ),
                };

                format!(
                    "(SELECT COALESCE(jsonb_agg({}), '[]'::jsonb) FROM {} AS {} WHERE {}) AS {}",
                    packed, related_table, RELATED_ALIAS, condition, related_table
                )
            }
        }
    }
}
