//! Pagination query and metadata shared by list endpoints.

use postboard::PageRequest;
use serde::{Deserialize, Serialize};

/// Raw `?page=&page_size=` query parameters.
///
/// Kept as strings so that malformed values fall back to defaults instead of
/// failing extraction; see [`PageRequest::parse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.page_size.as_deref())
    }
}

/// The `pagination` object in list responses.
///
/// ```json
/// { "page": 1, "page_size": 10, "total": 23, "total_pages": 3 }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    /// Row count before pagination was applied.
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: request.total_pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_from_request() {
        let q = PageQuery {
            page: Some("2".into()),
            page_size: Some("1000".into()),
        };
        let p = Pagination::new(q.to_request(), 101);
        assert_eq!(
            p,
            Pagination {
                page: 2,
                page_size: 50,
                total: 101,
                total_pages: 3,
            }
        );
    }
}
