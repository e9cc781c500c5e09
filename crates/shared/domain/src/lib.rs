//! Domain layer - password entry aggregate, value objects and ports.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Storage and encryption are reached only through the traits in [`ports`].

pub mod constants;
pub mod error;
pub mod id;
pub mod password_entry;
pub mod ports;
pub mod value_objects;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use id::PasswordEntryId;
pub use password_entry::{PasswordEntry, PasswordEntryPrimitives};
pub use ports::{
    EncryptionError, EncryptionService, PasswordEntryRepository, RepositoryError,
    RepositoryResult, Versioned, INITIAL_VERSION,
};
pub use value_objects::{
    Category, CreatedAt, EncryptedPassword, Notes, SiteName, SiteUrl, Tag, Tags, UpdatedAt,
    Username, ValueObject,
};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::{MockEncryptionService, MockPasswordEntryRepository};
