use std::fmt;

use crate::constants::MAX_NOTES_LENGTH;
use crate::error::{DomainError, DomainResult};

use super::ValueObject;

/// Free-form notes attached to an entry. Blank notes collapse to the empty state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Notes(Option<String>);

impl Notes {
    /// Trim and validate notes. Inner newlines are kept.
    ///
    /// # Errors
    /// `InvalidNotes` when the trimmed text exceeds [`MAX_NOTES_LENGTH`] characters.
    pub fn new(value: &str) -> DomainResult<Self> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        if trimmed.chars().count() > MAX_NOTES_LENGTH {
            return Err(DomainError::InvalidNotes(format!(
                "Notes cannot exceed {} characters",
                MAX_NOTES_LENGTH
            )));
        }

        Ok(Self(Some(trimmed.to_string())))
    }

    pub fn from_optional(value: Option<&str>) -> DomainResult<Self> {
        match value {
            Some(raw) => Self::new(raw),
            None => Ok(Self::empty()),
        }
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl ValueObject for Notes {
    type Primitive = Option<String>;

    fn to_primitive(&self) -> Option<String> {
        self.0.clone()
    }
}

impl fmt::Display for Notes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_notes_equal_empty() {
        let notes = Notes::new("   ").unwrap();
        assert_eq!(notes, Notes::empty());
        assert!(notes.is_empty());
        assert_eq!(notes.value(), None);
    }

    #[test]
    fn test_notes_keep_newlines() {
        let notes = Notes::new("  line one\nline two  ").unwrap();
        assert_eq!(notes.value(), Some("line one\nline two"));
    }

    #[test]
    fn test_notes_maximum_length() {
        let exact = "n".repeat(MAX_NOTES_LENGTH);
        assert!(Notes::new(&exact).is_ok());

        let too_long = "n".repeat(MAX_NOTES_LENGTH + 1);
        let err = Notes::new(&too_long).unwrap_err();
        assert!(matches!(err, DomainError::InvalidNotes(_)));
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn test_notes_from_optional() {
        assert!(Notes::from_optional(None).unwrap().is_empty());
        assert_eq!(
            Notes::from_optional(Some("remember 2FA")).unwrap().value(),
            Some("remember 2FA")
        );
    }
}
