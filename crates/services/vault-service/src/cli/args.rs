//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Vault - owner-scoped encrypted password entries
#[derive(Parser, Debug)]
#[command(name = "vault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Snapshot file holding the entries
    #[arg(long, global = true, env = "VAULT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Base64-encoded 32-byte encryption key (needed to add, reveal or change a password)
    #[arg(long, global = true, env = "VAULT_ENCRYPTION_KEY", hide_env_values = true)]
    pub key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a fresh random encryption key
    GenerateKey,

    /// Store a new entry
    Add(AddArgs),

    /// List a user's entries
    List(UserArgs),

    /// Search a user's entries
    Search(SearchArgs),

    /// Show one entry (without the password)
    Show(EntryArgs),

    /// Decrypt and print an entry's password
    Reveal(EntryArgs),

    /// Change fields of an entry
    Update(UpdateArgs),

    /// Delete an entry
    Delete(EntryArgs),
}

impl Commands {
    /// Whether the command writes the snapshot file
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Commands::Add(_) | Commands::Update(_) | Commands::Delete(_)
        )
    }
}

/// Acting user
#[derive(Args, Debug)]
pub struct UserArgs {
    /// Id of the acting (owning) user
    #[arg(short, long)]
    pub user: String,
}

/// Acting user plus target entry
#[derive(Args, Debug)]
pub struct EntryArgs {
    #[command(flatten)]
    pub user: UserArgs,

    /// Entry id
    #[arg(long)]
    pub id: String,
}

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub user: UserArgs,

    #[arg(long)]
    pub site: String,

    #[arg(long)]
    pub username: String,

    /// Plaintext password to encrypt
    #[arg(long, env = "VAULT_ENTRY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// One of PERSONAL, WORK, FINANCE, SOCIAL, EMAIL, SHOPPING, OTHER
    #[arg(long, default_value = "OTHER")]
    pub category: String,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub user: UserArgs,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    /// Substring of site name, username or domain
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub entry: EntryArgs,

    #[arg(long)]
    pub site: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    /// New plaintext password
    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// New URL; pass an empty string to clear
    #[arg(long)]
    pub url: Option<String>,

    /// New notes; pass an empty string to clear
    #[arg(long)]
    pub notes: Option<String>,

    /// Replace all tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Option<Vec<String>>,

    /// Drop all tags
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,

    /// Fail if the entry changed since this version
    #[arg(long)]
    pub expected_version: Option<u64>,
}
