//! Pagination for user search.

use serde::Serialize;

/// Default number of results per page.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Build a page request. Pages below 1 become page 1 and a
    /// non-positive page size becomes [`DEFAULT_PER_PAGE`].
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: if per_page > 0 { per_page } else { DEFAULT_PER_PAGE },
        }
    }

    /// Parse an optional raw page number; anything unparseable is page 1.
    pub fn from_raw(raw: Option<&str>, per_page: i64) -> Self {
        let page = raw.and_then(|r| r.trim().parse::<i64>().ok()).unwrap_or(1);
        Self::new(page, per_page)
    }

    /// SQL `OFFSET` for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// SQL `LIMIT` for this page.
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: request.page,
            per_page: request.per_page,
        }
    }
}

/// Normalise a free-text search term. Returns `None` for a blank query.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Escape `%`, `_` and `\` so the term matches literally inside `ILIKE`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
