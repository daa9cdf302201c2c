//! List query parameters and response envelopes for the REST backend.

use serde::{Deserialize, Serialize};

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Free-text search term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Status filter (e.g. "active").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            status: None,
        }
    }
}

impl ListQuery {
    /// Query that fetches everything in one page, used for pick-lists.
    #[must_use]
    pub fn all() -> Self {
        Self {
            limit: 1000,
            ..Self::default()
        }
    }

    /// Sets the search term; blank terms are dropped.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    /// Sets the status filter.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Number of records skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Response wrapper for list endpoints: `{ data, pagination: { totalRecords } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of records across all pages.
    #[serde(default)]
    pub total_records: u64,
}

impl<T> ListResponse<T> {
    /// Creates a list response.
    #[must_use]
    pub fn new(data: Vec<T>, total_records: u64) -> Self {
        Self {
            data,
            pagination: Pagination { total_records },
        }
    }

    /// Number of pages for the given page size (at least one).
    #[must_use]
    pub fn total_pages(&self, limit: u32) -> u64 {
        if self.pagination.total_records == 0 || limit == 0 {
            return 1;
        }
        self.pagination.total_records.div_ceil(u64::from(limit))
    }
}

/// Response wrapper for single resources: `{ data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// The resource.
    pub data: T,
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
