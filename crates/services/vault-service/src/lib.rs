//! Vault Service Library
//!
//! Application use cases for password entries plus the concrete adapters
//! behind the domain ports: an AES-256-GCM cipher and an in-memory,
//! snapshot-backed store. Used by the `vault` binary and by integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

pub use config::VaultServiceConfig;
pub use infra::AesGcmEncryption;
pub use repository::InMemoryPasswordEntryStore;
pub use service::{
    EntryFilter, NewPasswordEntry, PasswordEntryManager, PasswordEntryService,
    UpdatePasswordEntry,
};
