//! Pagination
//!
//! LIMIT/OFFSET rendering and the page window computed from a row count.

use serde::Serialize;

use crate::validation::ValidationError;

/// LIMIT/OFFSET of a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_sql(&self) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}

/// Page position derived from the total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub page: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Pages below 1 read as 1 and pages past the end clamp to the last page.
    /// With no rows the window is page 0 at offset 0.
    pub fn compute(total: u64, per_page: u64, page: u64) -> Result<Self, ValidationError> {
        if per_page == 0 {
            return Err(ValidationError::InvalidPageSize);
        }

        let total_pages = total.div_ceil(per_page);
        let page = page.max(1).min(total_pages);
        let offset = page.saturating_sub(1) * per_page;

        Ok(Self {
            total,
            per_page,
            total_pages,
            page,
            offset,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new()
            .with_limit(self.per_page)
            .with_offset(self.offset)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(rename = "total_page")]
    pub total_pages: u64,
    pub per_page: u64,
    pub page: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub(crate) fn new(window: PageWindow, data: Vec<T>) -> Self {
        Self {
            data,
            total_pages: window.total_pages,
            per_page: window.per_page,
            page: window.page,
            total: window.total,
        }
    }

    /// Convert every row, keeping the page position.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paginated<U>, E> {
        let data = self.data.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Paginated {
            data,
            total_pages: self.total_pages,
            per_page: self.per_page,
            page: self.page,
            total: self.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_to_sql() {
        assert_eq!(Pagination::new().to_sql(), "");
        assert_eq!(Pagination::new().with_limit(1).to_sql(), "LIMIT 1");
        assert_eq!(
            Pagination::new().with_limit(10).with_offset(20).to_sql(),
            "LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_window_in_range() {
        let window = PageWindow::compute(23, 10, 2).unwrap();
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.page, 2);
        assert_eq!(window.offset, 10);
        assert_eq!(window.pagination().to_sql(), "LIMIT 10 OFFSET 10");
    }

    #[test]
    fn test_window_clamps_past_last_page() {
        let window = PageWindow::compute(23, 10, 9).unwrap();
        assert_eq!(window.page, 3);
        assert_eq!(window.offset, 20);
    }

    #[test]
    fn test_window_page_zero_reads_as_first() {
        let window = PageWindow::compute(5, 2, 0).unwrap();
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_window_without_rows() {
        let window = PageWindow::compute(0, 10, 1).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.total_pages, 0);
        assert_eq!(window.page, 0);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_window_rejects_zero_page_size() {
        assert_eq!(
            PageWindow::compute(10, 0, 1).unwrap_err(),
            ValidationError::InvalidPageSize
        );
    }

    #[test]
    fn test_paginated_serializes_page_shape() {
        let window = PageWindow::compute(3, 2, 2).unwrap();
        let page = Paginated::new(window, vec![json!({"id": 3})]);

        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "data": [{"id": 3}],
                "total_page": 2,
                "per_page": 2,
                "page": 2,
                "total": 3
            })
        );
    }
}
