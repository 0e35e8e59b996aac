//! Shared pagination types
//!
//! Every listing that paginates goes through `PageRequest`; bounds are
//! validated up front instead of being clamped silently.

use serde::Serialize;

use super::DomainError;

/// Validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::Validation(
                "page numbers start at 1".to_string(),
            ));
        }
        if size == 0 {
            return Err(DomainError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Zero-based page index, the form SeaORM's paginator expects.
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

/// One page of results plus the totals the client needs for paging controls
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn from_items(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_items,
            total_pages: total_items.div_ceil(request.size()),
        }
    }
}
