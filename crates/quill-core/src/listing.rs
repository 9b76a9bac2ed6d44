//! List filters and pagination.

use serde::{Deserialize, Serialize};

use crate::domain::{CommentStatus, PostStatus};

/// Page size used for post listings when the client sends none.
pub const DEFAULT_POST_LIMIT: u64 = 10;
/// Page size used for comment listings when the client sends none.
pub const DEFAULT_COMMENT_LIMIT: u64 = 20;
/// Upper bound applied to any client-supplied page size.
pub const DEFAULT_MAX_LIMIT: u64 = 100;
/// Largest value SQL backends accept for `LIMIT`/`OFFSET` (a signed 64-bit integer).
pub const MAX_SQL_OFFSET: u64 = i64::MAX as u64;

/// Optional filters for post listings, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    /// Category slug.
    pub category: Option<String>,
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
}

impl PostFilter {
    /// Filter used by the public listing: published posts only.
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

/// Optional filters for comment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub post_id: Option<i32>,
    pub status: Option<CommentStatus>,
}

/// A validated page request. `page` is 1-based and `limit` is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a page request from raw client input.
    ///
    /// Missing or zero `page` becomes 1. Missing `limit` becomes
    /// `default_limit`; any limit is clamped into `1..=max_limit`.
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64, max_limit: u64) -> Self {
        let max_limit = max_limit.clamp(1, MAX_SQL_OFFSET);
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows to skip. Pages past the addressable range land on an empty
    /// page instead of overflowing the bound SQL parameter.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(MAX_SQL_OFFSET)
    }
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// One page of results plus the total row count of the unpaginated query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            request,
            total,
        }
    }

    pub fn pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit())
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.request.page(),
            limit: self.request.limit(),
            total: self.total,
            pages: self.pages(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            request: self.request,
            total: self.total,
        }
    }
}
