//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MIN_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Pagination query parameters.
///
/// Query strings arrive as text, so `serde_with` parses the numbers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates the parameters and returns the resolved page plus the
    /// `(offset, limit)` pair for the repository.
    ///
    /// Defaults: `page` = 1, `page_size` = 25. Page size must lie in
    /// `10..=1000`.
    pub fn resolve(&self) -> Result<ResolvedPage, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                serde_json::json!({ "page": page }),
            ));
        }

        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"),
                serde_json::json!({ "page_size": page_size }),
            ));
        }

        Ok(ResolvedPage {
            page,
            page_size,
            offset: i64::from(page - 1) * i64::from(page_size),
            limit: i64::from(page_size),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    pub page: u32,
    pub page_size: u32,
    pub offset: i64,
    pub limit: i64,
}

impl ResolvedPage {
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let size = i64::from(self.page_size);
        PaginationMeta {
            page: self.page,
            page_size: self.page_size,
            total,
            total_pages: (total + size - 1) / size,
        }
    }
}

/// Pagination block included in list responses.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let resolved = params(None, None).resolve().unwrap();
        assert_eq!(resolved.page, 1);
        assert_eq!(resolved.offset, 0);
        assert_eq!(resolved.limit, 25);
    }

    #[test]
    fn test_custom_page_and_size() {
        let resolved = params(Some(3), Some(50)).resolve().unwrap();
        assert_eq!(resolved.offset, 100);
        assert_eq!(resolved.limit, 50);
    }

    #[test]
    fn test_page_zero_is_error() {
        let err = params(Some(0), None).resolve().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(9)).resolve().is_err());
        assert!(params(None, Some(10)).resolve().is_ok());
        assert!(params(None, Some(1000)).resolve().is_ok());
        assert!(params(None, Some(1001)).resolve().is_err());
    }

    #[test]
    fn test_page_size_error_message() {
        let err = params(None, Some(5)).resolve().unwrap_err();
        assert_eq!(err.to_string(), "Page size must be between 10 and 1000");
    }

    #[test]
    fn test_meta_rounds_pages_up() {
        let resolved = params(Some(1), Some(10)).resolve().unwrap();
        assert_eq!(resolved.meta(0).total_pages, 0);
        assert_eq!(resolved.meta(10).total_pages, 1);
        assert_eq!(resolved.meta(11).total_pages, 2);
    }
}
