//! Shared pagination utilities
//!
//! ```rust,ignore
//! let params = PaginationParams::new(Some(2), Some(20));
//! let rows = fetch(params.per_page(), params.offset()).await?;
//! let page = Paginated::from_items(rows, &params, total);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::FieldError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits an `i64` at the largest page size
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Page request parameters (page is 1-indexed)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Items per page, defaulting to 20 and clamped to 1-100
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Reject explicit values that would otherwise be silently clamped
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(page) = self.page {
            if page < 1 {
                return Err(FieldError::invalid("page", "must be greater than 0"));
            }
            if page > MAX_PAGE {
                return Err(FieldError::OutOfRange {
                    field: "page",
                    min: "1".to_string(),
                    max: MAX_PAGE.to_string(),
                });
            }
        }
        if let Some(per_page) = self.per_page {
            if !(1..=MAX_PAGE_SIZE).contains(&per_page) {
                return Err(FieldError::OutOfRange {
                    field: "per_page",
                    min: "1".to_string(),
                    max: MAX_PAGE_SIZE.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Pagination metadata returned under `meta.pagination`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.per_page(), total)
    }
}

/// A page of items plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_custom() {
        let params = PaginationParams::new(Some(3), Some(50));
        assert_eq!(params.offset(), 100);
    }

    #[test]
    fn test_pagination_params_clamping() {
        let params = PaginationParams::new(Some(-1), Some(200));
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 100);
    }

    #[test]
    fn test_pagination_params_validation() {
        assert!(PaginationParams::new(Some(1), Some(100)).validate().is_ok());
        assert!(PaginationParams::new(Some(0), None).validate().is_err());
        assert!(PaginationParams::new(None, Some(0)).validate().is_err());
        assert!(PaginationParams::new(None, Some(101)).validate().is_err());
    }

    #[test]
    fn test_huge_page_is_rejected_not_overflowed() {
        let params = PaginationParams::new(Some(i64::MAX), Some(20));
        assert!(matches!(params.validate(), Err(FieldError::OutOfRange { field: "page", .. })));
        assert_eq!(params.offset(), i64::MAX);

        let last = PaginationParams::new(Some(MAX_PAGE), Some(MAX_PAGE_SIZE));
        assert!(last.validate().is_ok());
        assert_eq!(last.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_pagination_metadata() {
        let meta = PaginationMetadata::new(2, 10, 25);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_prev);
        assert!(meta.has_next);

        let last = PaginationMetadata::new(3, 10, 30);
        assert_eq!(last.pages, 3);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pagination_metadata_empty() {
        let meta = PaginationMetadata::new(1, 10, 0);
        assert_eq!(meta.pages, 0);
        assert!(!meta.has_prev);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_paginated_map() {
        let params = PaginationParams::default();
        let mapped = Paginated::from_items(vec![1, 2, 3], &params, 3).map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.pagination.total, 3);
    }
}
