//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, reusable across list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_PAGE_SIZE)
    }

    /// Zero-based page index for offset queries, clamped so the
    /// offset multiplication cannot overflow.
    pub fn page_index(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .min(u64::MAX / self.limit().max(1))
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        let params = PaginationParams {
            page: 1,
            per_page: 10_000,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_index_is_zero_based() {
        assert_eq!(PaginationParams::default().page_index(), 0);

        let params = PaginationParams {
            page: 3,
            per_page: 20,
        };
        assert_eq!(params.page_index(), 2);
    }

    #[test]
    fn test_page_index_cannot_overflow_offset() {
        let params = PaginationParams {
            page: u64::MAX,
            per_page: 20,
        };
        let index = params.page_index();
        assert!(index.checked_mul(params.limit()).is_some());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Paginated<u32> = Paginated::new(vec![1, 2, 3], 1, 20, 41);
        assert_eq!(page.meta.total_pages, 3);
    }
}
