//! Offset pagination policy shared by the post and comment listings.
//!
//! Query strings are parsed leniently: anything missing, non-numeric, or
//! non-positive falls back to the default rather than producing an error.

/// Page used when the caller supplies none (or an invalid one).
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller supplies none (or an invalid one).
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound on `page_size`; larger requests are clamped to this.
pub const MAX_PAGE_SIZE: u64 = 50;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Apply the policy to already-parsed numbers.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p as u64,
            _ => DEFAULT_PAGE,
        };
        let page_size = match page_size {
            Some(s) if s > 0 => (s as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    /// Apply the policy to raw query-string values.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self::new(
            page.and_then(|p| p.trim().parse().ok()),
            page_size.and_then(|s| s.trim().parse().ok()),
        )
    }

    /// Number of rows to skip: `(page - 1) * page_size`, saturating.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// `ceil(total / page_size)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }
}
