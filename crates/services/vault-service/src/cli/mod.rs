//! CLI module - command-line interface for the vault.
//!
//! Provides commands for:
//! - `generate-key` - Create an encryption key
//! - `add` / `update` / `delete` - Manage entries
//! - `list` / `search` / `show` / `reveal` - Read entries

pub mod args;

pub use args::{Cli, Commands};
