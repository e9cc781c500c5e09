//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (storage, transport, cipher).
//! Port failures have their own types in [`crate::ports`].

use thiserror::Error;

/// Domain-specific errors for business rule violations.
///
/// Every value object fails with its own variant so callers can tell which
/// field was rejected without parsing the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entry identifier is empty or malformed
    #[error("Invalid password entry id: {0}")]
    InvalidPasswordEntryId(String),

    #[error("Invalid site name: {0}")]
    InvalidSiteName(String),

    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid encrypted password: {0}")]
    InvalidEncryptedPassword(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid notes: {0}")]
    InvalidNotes(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Timestamp could not be parsed into an instant
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Acting user does not own the entry
    #[error("User {user_id} is not allowed to access password entry {entry_id}")]
    UnauthorizedAccess { entry_id: String, user_id: String },
}

impl DomainError {
    /// Create an unauthorized access error
    pub fn unauthorized(entry_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        DomainError::UnauthorizedAccess {
            entry_id: entry_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Check if this error is a field validation failure
    pub fn is_validation(&self) -> bool {
        !matches!(self, DomainError::UnauthorizedAccess { .. })
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
