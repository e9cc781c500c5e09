use std::fmt;

use crate::constants::MAX_SITE_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};

use super::impl_string_value_object;

/// Display name of the site an entry belongs to (e.g. "GitHub").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteName(String);

impl SiteName {
    /// Trim and validate a site name.
    ///
    /// # Errors
    /// `InvalidSiteName` when the trimmed value is empty or longer than
    /// [`MAX_SITE_NAME_LENGTH`] characters.
    pub fn new(value: &str) -> DomainResult<Self> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidSiteName(
                "Site name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > MAX_SITE_NAME_LENGTH {
            return Err(DomainError::InvalidSiteName(format!(
                "Site name cannot exceed {} characters",
                MAX_SITE_NAME_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl_string_value_object!(SiteName);

impl fmt::Display for SiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
