//! Tag names
//!
//! Tags are matched case-insensitively by the database (`citext`), so the
//! original casing of the first use is what gets stored.

use super::ValidationError;

const MAX_TAG_LEN: usize = 50;

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "tag" });
        }

        if trimmed.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "tag",
                max: MAX_TAG_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Validate a submitted tag list, skipping blank entries.
    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, ValidationError> {
        raw.iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.trim().is_empty())
            .map(Self::new)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_names() {
        assert_eq!(TagName::new("  rust ").unwrap().as_str(), "rust");
    }

    #[test]
    fn parse_list_skips_blanks() {
        let tags = TagName::parse_list(&["Rust", "", "  ", "async"]).unwrap();
        let names: Vec<_> = tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["Rust", "async"]);
    }

    #[test]
    fn parse_list_rejects_oversized() {
        let long = "t".repeat(51);
        assert!(TagName::parse_list(&["ok".to_string(), long]).is_err());
    }
}
