//! Entry commands - run a use case against the snapshot-backed store.

use std::sync::Arc;

use serde::Serialize;

use common::{AppError, AppResult};
use domain::{
    Category, EncryptedPassword, EncryptionError, EncryptionService, PasswordEntry,
    PasswordEntryId, PasswordEntryPrimitives, Versioned,
};

use crate::cli::args::{AddArgs, SearchArgs, UpdateArgs};
use crate::cli::Commands;
use crate::config::VaultServiceConfig;
use crate::infra::AesGcmEncryption;
use crate::repository::{InMemoryPasswordEntryStore, SnapshotLock};
use crate::service::{
    EntryFilter, NewPasswordEntry, PasswordEntryManager, PasswordEntryService,
    UpdatePasswordEntry,
};

/// Printed form of a stored entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryOutput {
    version: u64,
    #[serde(flatten)]
    entry: PasswordEntryPrimitives,
}

impl From<&Versioned<PasswordEntry>> for EntryOutput {
    fn from(stored: &Versioned<PasswordEntry>) -> Self {
        Self {
            version: stored.version,
            entry: stored.value.to_primitives(),
        }
    }
}

/// Stand-in cipher for commands that never touch a password.
struct NoEncryptionKey;

impl EncryptionService for NoEncryptionKey {
    fn encrypt(
        &self,
        _plaintext: &str,
        _owner_id: &str,
    ) -> Result<EncryptedPassword, EncryptionError> {
        Err(no_key())
    }

    fn decrypt(
        &self,
        _encrypted: &EncryptedPassword,
        _owner_id: &str,
    ) -> Result<String, EncryptionError> {
        Err(no_key())
    }
}

fn no_key() -> EncryptionError {
    EncryptionError::InvalidKey("no encryption key configured".to_string())
}

/// Execute an entry command and print its output.
pub async fn execute(command: Commands, config: &VaultServiceConfig) -> AppResult<()> {
    let output = run(command, config).await?;
    println!("{}", output);
    Ok(())
}

/// Run an entry command and return what it prints.
///
/// Mutating commands hold the snapshot lock from load to save, so a second
/// `vault` process either sees their write or waits for it. Read-only
/// commands never write the snapshot.
pub async fn run(command: Commands, config: &VaultServiceConfig) -> AppResult<String> {
    let lock = if command.is_mutation() {
        Some(SnapshotLock::acquire(&config.data_file).await?)
    } else {
        None
    };

    let store = Arc::new(InMemoryPasswordEntryStore::load_file(&config.data_file).await?);
    let service = PasswordEntryManager::new(store.clone(), cipher_for(&command, config)?);

    let output = match command {
        Commands::Add(args) => {
            let created = add(&service, args).await?;
            render(&EntryOutput::from(&created))?
        }
        Commands::List(args) => render_entries(&service.list_entries(&args.user).await?)?,
        Commands::Search(args) => render_entries(&search(&service, args).await?)?,
        Commands::Show(args) => {
            let id = PasswordEntryId::new(args.id)?;
            let entry = service.get_entry(&id, &args.user.user).await?;
            render(&EntryOutput::from(&entry))?
        }
        Commands::Reveal(args) => {
            let id = PasswordEntryId::new(args.id)?;
            service.reveal_password(&id, &args.user.user).await?
        }
        Commands::Update(args) => {
            let updated = update(&service, args).await?;
            render(&EntryOutput::from(&updated))?
        }
        Commands::Delete(args) => {
            let id = PasswordEntryId::new(args.id)?;
            service.delete_entry(&id, &args.user.user).await?;
            format!("Deleted {}", id)
        }
        Commands::GenerateKey => {
            return Err(AppError::internal("generate-key is not an entry command"));
        }
    };

    if let Some(lock) = &lock {
        store.save_file_locked(&config.data_file, lock).await?;
    }

    Ok(output)
}

/// Build the cipher. Only commands that encrypt or decrypt require a key.
fn cipher_for(
    command: &Commands,
    config: &VaultServiceConfig,
) -> AppResult<Arc<dyn EncryptionService>> {
    let needs_key = match command {
        Commands::Add(_) | Commands::Reveal(_) => true,
        Commands::Update(args) => args.password.is_some(),
        _ => false,
    };

    match config.encryption_key() {
        Ok(key) => Ok(Arc::new(AesGcmEncryption::from_base64_key(key)?)),
        Err(e) if needs_key => Err(e),
        Err(_) => Ok(Arc::new(NoEncryptionKey)),
    }
}

async fn add(
    service: &PasswordEntryManager,
    args: AddArgs,
) -> AppResult<Versioned<PasswordEntry>> {
    let input = NewPasswordEntry {
        site_name: args.site,
        site_url: args.url,
        username: args.username,
        password: args.password,
        category: args.category,
        notes: args.notes,
        tags: args.tags,
    };
    service.create_entry(&args.user.user, input).await
}

async fn search(
    service: &PasswordEntryManager,
    args: SearchArgs,
) -> AppResult<Vec<Versioned<PasswordEntry>>> {
    let filter = EntryFilter {
        category: args
            .category
            .as_deref()
            .map(Category::from_string)
            .transpose()?,
        tag: args.tag,
        text: args.text,
    };
    service.search_entries(&args.user.user, &filter).await
}

async fn update(
    service: &PasswordEntryManager,
    args: UpdateArgs,
) -> AppResult<Versioned<PasswordEntry>> {
    let id = PasswordEntryId::new(args.entry.id)?;
    let tags = if args.clear_tags {
        Some(Vec::new())
    } else {
        args.tags
    };

    let changes = UpdatePasswordEntry {
        site_name: args.site,
        site_url: args.url,
        username: args.username,
        password: args.password,
        category: args.category,
        notes: args.notes,
        tags,
        expected_version: args.expected_version,
    };
    service.update_entry(&id, &args.entry.user.user, changes).await
}

fn render_entries(entries: &[Versioned<PasswordEntry>]) -> AppResult<String> {
    let output: Vec<EntryOutput> = entries.iter().map(EntryOutput::from).collect();
    render(&output)
}

fn render<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to encode output: {}", e)))
}
