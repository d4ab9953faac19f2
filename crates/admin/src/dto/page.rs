use serde::Serialize;

use crate::config::Pagination;

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based.
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(content: Vec<T>, pagination: Pagination, total_elements: i64) -> Self {
        Self {
            content,
            page: pagination.page,
            size: pagination.size,
            total_elements,
            total_pages: pagination.total_pages(total_elements),
        }
    }

    /// Convert each item, keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2, 3], Pagination { page: 1, size: 3 }, 7);
        let json = serde_json::to_value(page.map(|n| n * 10)).unwrap();
        assert_eq!(json["content"], serde_json::json!([10, 20, 30]));
        assert_eq!(json["page"], 1);
        assert_eq!(json["totalElements"], 7);
        assert_eq!(json["totalPages"], 3);
    }
}
