//! Service layer - password entry use cases.

mod password_entry_service;

pub use password_entry_service::{
    EntryFilter, NewPasswordEntry, PasswordEntryManager, PasswordEntryService,
    UpdatePasswordEntry,
};
