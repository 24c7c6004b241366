//! Note title and body validation

use super::ValidationError;

/// Maximum length for note titles
const MAX_TITLE_LEN: usize = 200;

/// Maximum length for note bodies
const MAX_BODY_LEN: usize = 20_000;

/// Validated note title: non-empty after trimming, bounded length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTitle(String);

impl NoteTitle {
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

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated note body: may be empty, bounded length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBody(String);

impl NoteBody {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_BODY_LEN {
            return Err(ValidationError::TooLong {
                field: "body",
                max: MAX_BODY_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
