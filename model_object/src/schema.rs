use crate::traits::Model;

/// Per-model facts the SQL generator and hydrator work from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    pub model: &'static str,
    pub table: String,
    pub primary_key: &'static str,
    pub fillable: &'static [&'static str],
    pub hidden: &'static [&'static str],
    pub soft_delete_column: Option<&'static str>,
    pub timestamps: bool,
}

impl ModelSchema {
    pub fn of<M: Model>() -> Self {
        let full_name = std::any::type_name::<M>();
        let model = full_name
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(full_name);

        Self {
            model,
            table: M::table_name(),
            primary_key: M::primary_key(),
            fillable: M::fillable(),
            hidden: M::hidden(),
            soft_delete_column: M::soft_delete_column(),
            timestamps: M::timestamps(),
        }
    }

    /// `table.column`
    pub fn qualified(&self, column: &str) -> String {
        format!("{}.{}", self.table, column)
    }

    pub fn is_fillable(&self, column: &str) -> bool {
        self.fillable.contains(&column)
    }
}
