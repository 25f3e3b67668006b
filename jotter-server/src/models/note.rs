//! Note title and content validation
//!
//! Content is required and capped at 500 characters (the column width notes
//! always had). Titles are optional; a blank title is the same as no title.

use super::ValidationError;

/// Maximum length for note content, in characters
pub const MAX_CONTENT_LEN: usize = 500;

/// Maximum length for note titles, in characters
pub const MAX_TITLE_LEN: usize = 100;

/// Validated note body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContent(String);

impl NoteContent {
    /// Create note content, trimming surrounding whitespace.
    ///
    /// # Example
    /// ```
    /// use jotter_server::models::NoteContent;
    ///
    /// assert!(NoteContent::new("buy milk").is_ok());
    /// assert!(NoteContent::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        if trimmed.chars().count() > MAX_CONTENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NoteContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated note title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTitle(String);

impl NoteTitle {
    /// Parse an optional title. Blank input yields `Ok(None)`.
    pub fn parse(s: &str) -> Result<Option<Self>, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Some(Self(trimmed.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NoteTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed() {
        let content = NoteContent::new("  hello  ").unwrap();
        assert_eq!(content.as_str(), "hello");
    }

    #[test]
    fn rejects_blank_content() {
        let err = NoteContent::new(" \n\t ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "content" }));
    }

    #[test]
    fn content_max_length_counts_chars() {
        // multi-byte characters count once
        let at_limit = "é".repeat(MAX_CONTENT_LEN);
        assert!(NoteContent::new(&at_limit).is_ok());

        let over = "a".repeat(MAX_CONTENT_LEN + 1);
        let err = NoteContent::new(&over).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 500, .. }));
    }

    #[test]
    fn blank_title_is_none() {
        assert_eq!(NoteTitle::parse("").unwrap(), None);
        assert_eq!(NoteTitle::parse("   ").unwrap(), None);
    }

    #[test]
    fn title_is_trimmed_and_capped() {
        let title = NoteTitle::parse(" Groceries ").unwrap().unwrap();
        assert_eq!(title.as_str(), "Groceries");

        let long = "t".repeat(MAX_TITLE_LEN + 1);
        assert!(NoteTitle::parse(&long).is_err());
    }
}
