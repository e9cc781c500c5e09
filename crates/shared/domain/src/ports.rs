//! Ports - capability contracts the domain depends on but does not implement.
//!
//! Concrete adapters (cipher, storage) live in the service crates.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::DomainError;
use crate::id::PasswordEntryId;
use crate::password_entry::PasswordEntry;
use crate::value_objects::EncryptedPassword;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

// =============================================================================
// Encryption
// =============================================================================

/// Failures raised by an [`EncryptionService`] adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("Encryption failed: {0}")]
    Encrypt(String),

    /// Tampered or corrupted ciphertext, or the wrong key/owner
    #[error("Decryption failed: {0}")]
    Decrypt(String),

    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),
}

/// Turns plaintext into an [`EncryptedPassword`] and back.
///
/// `owner_id` scopes the operation to the owning account; a ciphertext
/// produced for one owner must not decrypt for another. Key material stays
/// inside the adapter and is never stored on the aggregate.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait EncryptionService: Send + Sync {
    /// Encrypt plaintext for the given owner.
    fn encrypt(
        &self,
        plaintext: &str,
        owner_id: &str,
    ) -> Result<EncryptedPassword, EncryptionError>;

    /// Recover plaintext, or fail with `Decrypt` if the payload does not verify.
    fn decrypt(
        &self,
        encrypted: &EncryptedPassword,
        owner_id: &str,
    ) -> Result<String, EncryptionError>;
}

// =============================================================================
// Repository
// =============================================================================

/// Failures raised by a [`PasswordEntryRepository`] adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Password entry {0} not found")]
    NotFound(String),

    #[error("Password entry {0} already exists")]
    AlreadyExists(String),

    /// Compare-and-swap failed: someone else wrote the entry first
    #[error(
        "Password entry {id} was modified concurrently \
         (expected version {expected}, found {actual})"
    )]
    VersionConflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Stored record no longer reconstructs into a valid aggregate
    #[error("Stored password entry is corrupted: {0}")]
    Corrupted(String),
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        RepositoryError::Corrupted(err.to_string())
    }
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// A stored value together with its optimistic-concurrency version.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(value: T, version: u64) -> Self {
        Self { value, version }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// First version assigned to a freshly inserted entry
pub const INITIAL_VERSION: u64 = 1;

/// Repository port for password entry persistence.
///
/// Writes use compare-and-swap on a per-entry version so two concurrent
/// updates of the same entry cannot silently overwrite each other.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PasswordEntryRepository: Send + Sync {
    /// Store a new entry, returning its initial version.
    ///
    /// # Errors
    /// `AlreadyExists` if the id is taken.
    async fn insert(&self, entry: &PasswordEntry) -> RepositoryResult<u64>;

    /// Replace a stored entry if its version still equals `expected_version`.
    ///
    /// # Errors
    /// `NotFound` if absent, `VersionConflict` if the stored version differs.
    async fn update(
        &self,
        entry: &PasswordEntry,
        expected_version: u64,
    ) -> RepositoryResult<u64>;

    /// Find an entry by id regardless of owner
    async fn find_by_id(
        &self,
        id: &PasswordEntryId,
    ) -> RepositoryResult<Option<Versioned<PasswordEntry>>>;

    /// Find an entry by id, reporting other users' entries as absent
    async fn find_by_id_for_user(
        &self,
        id: &PasswordEntryId,
        user_id: &str,
    ) -> RepositoryResult<Option<Versioned<PasswordEntry>>>;

    /// List a user's entries, oldest first
    async fn find_by_user(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Vec<Versioned<PasswordEntry>>>;

    /// Delete a user's entry.
    ///
    /// # Errors
    /// `NotFound` if absent or owned by someone else.
    async fn delete(&self, id: &PasswordEntryId, user_id: &str) -> RepositoryResult<()>;
}
