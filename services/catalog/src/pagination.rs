//! Pagination utilities for the catalog service
//!
//! Normalizes untrusted page parameters and derives page metadata from a
//! total count.

use serde::Serialize;

/// Normalized pagination input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl PageRequest {
    /// Build from raw query parameters
    ///
    /// Non-positive pages silently clamp to 1; page_size clamps to
    /// [1, 100]. Defaults are page 1 and 20 items.
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1) as u32;
        let page_size = page_size.unwrap_or(20).clamp(1, 100) as u32;

        Self { page, page_size }
    }

    /// Offset of the first row of this page
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Row cap for this page
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    /// Assemble a page of results with derived metadata
    ///
    /// An empty result set still reports one page.
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        let total_pages = if total > 0 {
            (total as u64).div_ceil(request.page_size as u64) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params_defaults() {
        let request = PageRequest::from_params(None, None);

        assert_eq!(request, PageRequest { page: 1, page_size: 20 });
    }

    #[test]
    fn test_non_positive_pages_clamp_to_one() {
        for page in [-3, 0] {
            let request = PageRequest::from_params(Some(page), Some(20));

            assert_eq!(request.page, 1);
            assert_eq!(request.offset(), 0);
        }
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(PageRequest::from_params(Some(1), Some(0)).page_size, 1);
        assert_eq!(PageRequest::from_params(Some(1), Some(1000)).page_size, 100);
    }

    #[test]
    fn test_offset_and_limit() {
        let request = PageRequest::from_params(Some(3), Some(20));

        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn test_empty_result_set_reports_one_page() {
        let page = Paginated::<()>::new(vec![], 0, PageRequest::default());

        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_metadata_on_partial_last_page() {
        let request = PageRequest::from_params(Some(3), Some(20));
        let page = Paginated::new(vec![(); 5], 45, request);

        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_metadata_on_first_of_many_pages() {
        let request = PageRequest::from_params(Some(1), Some(20));
        let page = Paginated::new(vec![(); 20], 45, request);

        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }
}
