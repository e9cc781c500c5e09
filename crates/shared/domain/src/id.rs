//! Password entry identifier.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Opaque identifier of a password entry (UUID v4 text for generated ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PasswordEntryId(String);

impl PasswordEntryId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (e.g. from storage or a request path).
    ///
    /// # Errors
    /// `InvalidPasswordEntryId` when the value is blank.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidPasswordEntryId(
                "Password entry id cannot be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PasswordEntryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Uuid> for PasswordEntryId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl From<PasswordEntryId> for String {
    fn from(id: PasswordEntryId) -> Self {
        id.0
    }
}

impl fmt::Display for PasswordEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
