//! Relation descriptors
//!
//! Each model lists its relations in a static table of [`RelationDef`]s.
//! `with` resolves an entry by name into the condition tying related rows
//! to their parent.

/// How many related rows end up under the relation key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// First related row, or `null`
    One,
    /// Every related row, possibly none
    Many,
}

/// Alias of the related table inside the aggregate subquery, so a table
/// related to itself does not shadow the parent
pub(crate) const RELATED_ALIAS: &str = "related";

/// Static description of a relation.
///
/// ```
/// use model_object::relation::RelationDef;
///
/// const RELATIONS: &[RelationDef] = &[
///     RelationDef::has_many("comments", "comments", "post_id"),
///     RelationDef::has_one("author", "users", "user_id").hidden(&["password"]),
/// ];
/// assert_eq!(RELATIONS[1].local_key, "id");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    /// Accessor name; also the key the hydrated value is stored under
    pub name: &'static str,
    pub related_table: &'static str,
    pub foreign_key: &'static str,
    pub local_key: &'static str,
    pub cardinality: Cardinality,
    /// Columns of the related table never packed into the parent row
    pub hidden: &'static [&'static str],
}

impl RelationDef {
    /// The local table holds `foreign_key`, pointing at `related_table.local_key`.
    pub const fn has_one(
        name: &'static str,
        related_table: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        Self {
            name,
            related_table,
            foreign_key,
            local_key: "id",
            cardinality: Cardinality::One,
            hidden: &[],
        }
    }

    /// `related_table.foreign_key` points at the local table's `local_key`.
    pub const fn has_many(
        name: &'static str,
        related_table: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        Self {
            name,
            related_table,
            foreign_key,
            local_key: "id",
            cardinality: Cardinality::Many,
            hidden: &[],
        }
    }

    pub const fn local_key(mut self, local_key: &'static str) -> Self {
        self.local_key = local_key;
        self
    }

    pub const fn hidden(mut self, hidden: &'static [&'static str]) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden.contains(&column)
    }

    /// Resolve against `local_table`: which related rows belong to a parent row.
    pub fn resolve(&self, local_table: &str) -> Relation {
        let condition = match self.cardinality {
            Cardinality::One => format!(
                "{}.{} = {}.{}",
                RELATED_ALIAS, self.local_key, local_table, self.foreign_key
            ),
            Cardinality::Many => format!(
                "{}.{} = {}.{}",
                RELATED_ALIAS, self.foreign_key, local_table, self.local_key
            ),
        };

        Relation {
            name: self.name.to_string(),
            related_table: self.related_table.to_string(),
            cardinality: self.cardinality,
            condition,
        }
    }
}

/// A relation resolved against a concrete local table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub related_table: String,
    pub cardinality: Cardinality,
    /// `related.<col> = <local_table>.<col>`
    pub condition: String,
}
