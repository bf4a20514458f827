//! Thread listing filters
//!
//! Each optional predicate is a separate field so the query builder can
//! enumerate them explicitly.

use serde::Deserialize;

use super::{PageParams, Pagination, ValidationError};

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreadSort {
    /// Newest first
    #[default]
    Recent,
    /// Highest net votes first, newest first among ties
    Trending,
}

impl ThreadSort {
    /// Anything other than `trending` falls back to recency.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("trending") => Self::Trending,
            _ => Self::Recent,
        }
    }
}

/// Optional predicates for thread listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadFilter {
    /// Exact category name
    pub category: Option<String>,
    /// Case-insensitive substring of title or content
    pub search: Option<String>,
    /// Case-insensitive substring of any associated tag
    pub tag: Option<String>,
    /// Threads authored by this username
    pub author: Option<String>,
    /// Threads bookmarked by this username
    pub saved_by: Option<String>,
    pub sort: ThreadSort,
}

/// Query string accepted by `GET /threads`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub username: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

impl ThreadListParams {
    pub fn into_parts(self) -> Result<(ThreadFilter, Pagination), ValidationError> {
        let page = self.pagination.parse()?;
        let filter = ThreadFilter {
            category: non_blank(self.category),
            search: non_blank(self.search),
            tag: non_blank(self.tag),
            author: non_blank(self.username),
            saved_by: None,
            sort: ThreadSort::from_param(self.sort.as_deref()),
        };
        Ok((filter, page))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Build an `ILIKE` pattern matching `needle` anywhere, with LIKE
/// metacharacters escaped so they match literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parsing() {
        assert_eq!(ThreadSort::from_param(None), ThreadSort::Recent);
        assert_eq!(ThreadSort::from_param(Some("trending")), ThreadSort::Trending);
        assert_eq!(ThreadSort::from_param(Some("Trending ")), ThreadSort::Trending);
        assert_eq!(ThreadSort::from_param(Some("oldest")), ThreadSort::Recent);
    }

    #[test]
    fn blank_filters_are_dropped() {
        let params = ThreadListParams {
            category: Some("".into()),
            search: Some("  borrow  ".into()),
            tag: None,
            username: Some(" ".into()),
            sort: Some("trending".into()),
            pagination: PageParams::default(),
        };
        let (filter, page) = params.into_parts().unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.search.as_deref(), Some("borrow"));
        assert_eq!(filter.author, None);
        assert_eq!(filter.sort, ThreadSort::Trending);
        assert_eq!(page, Pagination::default());
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("snake_case"), "%snake\\_case%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
