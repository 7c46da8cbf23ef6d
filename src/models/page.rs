//! Pagination envelope shared by the listing endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Zero-based page request taken from query parameters
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PageQuery {
    pub page: i64,
    pub size: i64,
}

impl PageQuery {
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }

    /// Reject negative paging values before they reach LIMIT/OFFSET
    pub fn validated(self) -> AppResult<Self> {
        if self.page < 0 || self.size < 0 {
            return Err(AppError::Validation(format!(
                "Page and size must be non-negative, got page {} size {}",
                self.page, self.size
            )));
        }
        Ok(self)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Page of results; empty is a valid outcome
    pub data: Vec<T>,
    /// Zero-based page number
    pub page: i64,
    /// Requested page size
    pub size: i64,
    /// Total matching rows
    pub total_elements: i64,
    /// Total pages for this size
    pub total_pages: i64,
}

impl<T> Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: Vec<T>, query: PageQuery, total_elements: i64) -> Self {
        let total_pages = if query.size > 0 {
            (total_elements + query.size - 1) / query.size
        } else {
            0
        };
        Self {
            data,
            page: query.page,
            size: query.size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, ToSchema)]
    struct Row;

    #[test]
    fn empty_result_keeps_metadata() {
        let page = Paginated::<Row>::new(vec![], PageQuery { page: 2, size: 10 }, 0);
        assert!(page.data.is_empty());
        assert_eq!(page.page, 2);
        assert_eq!(page.size, 10);
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn partial_last_page_counts() {
        let page = Paginated::<Row>::new(vec![], PageQuery { page: 0, size: 15 }, 31);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn offset_is_page_times_size() {
        assert_eq!(PageQuery { page: 3, size: 15 }.offset(), 45);
    }

    #[test]
    fn negative_paging_is_rejected() {
        assert!(PageQuery { page: -1, size: 10 }.validated().is_err());
        assert!(PageQuery { page: 0, size: -5 }.validated().is_err());
    }

    #[test]
    fn zero_and_positive_paging_pass() {
        assert!(PageQuery { page: 0, size: 0 }.validated().is_ok());
        assert!(PageQuery { page: 3, size: 15 }.validated().is_ok());
    }
}
