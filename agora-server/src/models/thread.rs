//! Thread title and body validation

use super::ValidationError;

/// Maximum length for thread titles (matches the VARCHAR(255) column)
const MAX_TITLE_LEN: usize = 255;

/// Maximum length for thread bodies
const MAX_CONTENT_LEN: usize = 40_000;

/// Validated thread title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTitle(String);

impl ThreadTitle {
    /// Create a new thread title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use agora_server::models::ThreadTitle;
    ///
    /// assert!(ThreadTitle::new("Favourite borrow checker errors").is_ok());
    /// assert!(ThreadTitle::new("").is_err());
    /// assert!(ThreadTitle::new("   ").is_err());  // whitespace only
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ThreadTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated thread body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadContent(String);

impl ThreadContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        if s.chars().count() > MAX_CONTENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_titles() {
        assert!(ThreadTitle::new("My Thread").is_ok());
        assert!(ThreadTitle::new("a").is_ok());
        assert!(ThreadTitle::new("  Trimmed  ").is_ok());
    }

    #[test]
    fn rejects_whitespace_only() {
        assert!(matches!(
            ThreadTitle::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn max_length() {
        assert!(ThreadTitle::new(&"a".repeat(255)).is_ok());

        let err = ThreadTitle::new(&"a".repeat(256)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }

    #[test]
    fn trims_title_but_not_content() {
        let title = ThreadTitle::new("  hello  ").unwrap();
        assert_eq!(title.as_str(), "hello");

        let content = ThreadContent::new("  indented\n").unwrap();
        assert_eq!(content.as_str(), "  indented\n");
    }

    #[test]
    fn content_must_have_text() {
        assert!(ThreadContent::new("\n\t ").is_err());
    }
}
