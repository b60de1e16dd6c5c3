//! Builder state
//!
//! Every fragment a chain has collected so far. A fresh state selects `*`
//! from the model's table with no conditions.

use crate::query_builder::filter::WhereClause;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::projection::SelectField;
use crate::relation::Cardinality;
use crate::validation::ValidationError;

/// Which rows the soft-delete column lets through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrashedScope {
    /// Only rows whose deletion marker is null
    #[default]
    Exclude,
    /// Every row
    Include,
    /// Only soft-deleted rows
    Only,
}

/// A relation requested through `with`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EagerRelation {
    /// Key the decoded value is stored under
    pub name: String,
    /// Column carrying the packed rows
    pub column: String,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub(crate) projection: Vec<SelectField>,
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) eager: Vec<EagerRelation>,
    pub(crate) trashed: TrashedScope,
    pub(crate) pagination: Pagination,
    pub(crate) error: Option<ValidationError>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            projection: vec![SelectField::All],
            wheres: Vec::new(),
            order_by: Vec::new(),
            eager: Vec::new(),
            trashed: TrashedScope::default(),
            pagination: Pagination::default(),
            error: None,
        }
    }

    /// Back to a fresh state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn projection(&self) -> &[SelectField] {
        &self.projection
    }

    pub fn wheres(&self) -> &[WhereClause] {
        &self.wheres
    }

    pub fn eager(&self) -> &[EagerRelation] {
        &self.eager
    }

    pub fn trashed(&self) -> TrashedScope {
        self.trashed
    }

    pub fn is_default_projection(&self) -> bool {
        self.projection == [SelectField::All]
    }

    /// Keeps the first error; later ones are usually consequences of it.
    pub(crate) fn record_error(&mut self, error: ValidationError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
