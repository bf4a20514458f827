//! Pagination types

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Limit is clamped to 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculate SQL OFFSET value: (page - 1) * limit.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated result
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Calculate total number of pages.
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            1
        } else {
            let limit = i64::from(self.limit.max(1));
            u32::try_from((self.total + limit - 1) / limit).unwrap_or(u32::MAX)
        }
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Raw `page`/`limit` query parameters.
///
/// Kept as strings so a malformed number produces a JSON validation error
/// instead of the framework's plain-text rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn parse(&self) -> Result<Pagination, ValidationError> {
        let page = parse_number(self.page.as_deref(), "page")?.unwrap_or(1);
        let limit = parse_number(self.limit.as_deref(), "limit")?.unwrap_or(DEFAULT_LIMIT);
        Ok(Pagination::new(page, limit))
    }
}

fn parse_number(raw: Option<&str>, field: &'static str) -> Result<Option<u32>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidFormat {
                field,
                reason: "must be a positive whole number",
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(2, 10).offset(), 10);
        assert_eq!(Pagination::new(3, 25).offset(), 50);
    }

    #[test]
    fn clamps_page_and_limit() {
        assert_eq!(Pagination::new(0, 10).page, 1);
        assert_eq!(Pagination::new(1, 0).limit, 1);
        assert_eq!(Pagination::new(1, 999).limit, 100);
    }

    #[test]
    fn params_default_to_first_page_of_ten() {
        let p = PageParams::default().parse().unwrap();
        assert_eq!(p, Pagination::new(1, 10));
    }

    #[test]
    fn params_reject_garbage() {
        let params = PageParams {
            page: Some("two".into()),
            limit: None,
        };
        assert_eq!(
            params.parse().unwrap_err().to_string(),
            "page must be a positive whole number"
        );

        let params = PageParams {
            page: None,
            limit: Some("-3".into()),
        };
        assert!(params.parse().is_err());
    }

    #[test]
    fn total_pages() {
        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 0,
            page: 1,
            limit: 10,
        };
        assert_eq!(paginated.total_pages(), 1);
        assert!(!paginated.has_next());

        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 25,
            page: 2,
            limit: 10,
        };
        assert_eq!(paginated.total_pages(), 3);
        assert!(paginated.has_next());
    }
}
