use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MAX_TAG_LENGTH, TAG_PATTERN};
use crate::error::{DomainError, DomainResult};

use super::{impl_string_value_object, ValueObject};

static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(TAG_PATTERN).expect("tag pattern is a valid regex"));

/// A single label, stored lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Lower-case, trim and validate a tag.
    ///
    /// # Errors
    /// `InvalidTag` when the result is empty, longer than [`MAX_TAG_LENGTH`],
    /// contains whitespace, or uses characters outside `[a-z0-9_-]`.
    pub fn new(value: &str) -> DomainResult<Self> {
        let normalized = Self::normalize(value);

        if normalized.is_empty() {
            return Err(DomainError::InvalidTag("Tag cannot be empty".to_string()));
        }

        if normalized.chars().count() > MAX_TAG_LENGTH {
            return Err(DomainError::InvalidTag(format!(
                "Tag cannot exceed {} characters",
                MAX_TAG_LENGTH
            )));
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidTag(format!(
                "Tag '{}' cannot contain spaces",
                normalized
            )));
        }

        if !TAG_REGEX.is_match(&normalized) {
            return Err(DomainError::InvalidTag(format!(
                "Tag '{}' may only contain lowercase letters, digits, '-' and '_'",
                normalized
            )));
        }

        Ok(Self(normalized))
    }

    fn normalize(value: &str) -> String {
        value.trim().to_lowercase()
    }
}

impl_string_value_object!(Tag);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of unique tags. Keeps first-seen order; duplicates collapse silently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Build from already-validated tags, dropping duplicates.
    pub fn new(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut unique: Vec<Tag> = Vec::new();
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self(unique)
    }

    /// Validate each raw string as a [`Tag`] and collect the unique ones.
    ///
    /// # Errors
    /// The first `InvalidTag` encountered.
    pub fn from_strings<I, S>(values: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = values
            .into_iter()
            .map(|value| Tag::new(value.as_ref()))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self::new(tags))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Membership test against a raw string, compared in normalized form.
    pub fn contains(&self, value: &str) -> bool {
        let probe = Tag::normalize(value);
        self.0.iter().any(|tag| tag.as_str() == probe)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|tag| tag.0.clone()).collect()
    }
}

impl ValueObject for Tags {
    type Primitive = Vec<String>;

    fn to_primitive(&self) -> Vec<String> {
        self.to_strings()
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strings().join(", "))
    }
}
