//! Unified application error handling.
//!
//! Wraps domain and port failures in a single error type that services and
//! the CLI can report consistently. Port errors are carried unchanged.

use domain::{DomainError, EncryptionError, RepositoryError};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authorization
    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    // Port errors
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Repository(RepositoryError::NotFound(_)) => "NOT_FOUND",
            AppError::Repository(RepositoryError::AlreadyExists(_))
            | AppError::Repository(RepositoryError::VersionConflict { .. }) => "CONFLICT",
            AppError::Repository(RepositoryError::Unavailable(_)) => "SERVICE_UNAVAILABLE",
            AppError::Repository(RepositoryError::Corrupted(_)) => "STORAGE_ERROR",
            AppError::Encryption(EncryptionError::Decrypt(_)) => "DECRYPTION_FAILED",
            AppError::Encryption(_) => "ENCRYPTION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::Repository(RepositoryError::VersionConflict { .. }) => {
                "The entry was modified by another request; reload and retry".to_string()
            }
            AppError::Repository(RepositoryError::NotFound(_)) => "Resource not found".to_string(),

            // Hide details for internal/security errors
            AppError::Repository(e) => {
                tracing::error!("Repository error: {:?}", e);
                "A storage error occurred".to_string()
            }
            AppError::Encryption(e) => {
                tracing::error!("Encryption error: {:?}", e);
                "The password could not be processed".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnauthorizedAccess { .. } => AppError::Forbidden,
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
