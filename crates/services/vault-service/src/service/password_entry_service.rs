//! Password entry service - use cases over the entry aggregate.
//!
//! Turns raw input into value objects, runs it through the encryption port
//! and the aggregate's owner-gated mutators, then persists through the
//! repository port with compare-and-swap.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{
    Category, EncryptionService, Notes, PasswordEntry, PasswordEntryId, PasswordEntryRepository,
    RepositoryError, SiteName, SiteUrl, Tags, Username, Versioned,
};

/// Input for creating an entry. `password` is plaintext.
#[derive(Clone, Default)]
pub struct NewPasswordEntry {
    pub site_name: String,
    pub site_url: Option<String>,
    pub username: String,
    pub password: String,
    pub category: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl std::fmt::Debug for NewPasswordEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewPasswordEntry")
            .field("site_name", &self.site_name)
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("category", &self.category)
            .field("notes", &self.notes)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Partial update of an entry. `None` leaves a field untouched; an empty
/// string for `site_url` or `notes` clears it.
#[derive(Clone, Default)]
pub struct UpdatePasswordEntry {
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub username: Option<String>,
    /// New plaintext password
    pub password: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Version the caller last saw; defaults to the version read
    pub expected_version: Option<u64>,
}

impl UpdatePasswordEntry {
    /// Check if no field is being changed
    pub fn is_empty(&self) -> bool {
        self.site_name.is_none()
            && self.site_url.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.category.is_none()
            && self.notes.is_none()
            && self.tags.is_none()
    }
}

impl std::fmt::Debug for UpdatePasswordEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePasswordEntry")
            .field("site_name", &self.site_name)
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("category", &self.category)
            .field("notes", &self.notes)
            .field("tags", &self.tags)
            .field("expected_version", &self.expected_version)
            .finish()
    }
}

/// Criteria for searching a user's entries. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub category: Option<Category>,
    pub tag: Option<String>,
    /// Case-insensitive substring of site name, username or URL domain
    pub text: Option<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &PasswordEntry) -> bool {
        if let Some(category) = self.category {
            if entry.category() != category {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !entry.tags().contains(tag) {
                return false;
            }
        }

        if let Some(text) = &self.text {
            let needle = text.trim().to_lowercase();
            if needle.is_empty() {
                return true;
            }
            let domain = entry.site_url().domain().unwrap_or_default();
            let haystacks = [
                entry.site_name().as_str().to_lowercase(),
                entry.username().as_str().to_lowercase(),
                domain.to_lowercase(),
            ];
            return haystacks.iter().any(|h| h.contains(&needle));
        }

        true
    }
}

/// Password entry service trait for dependency injection.
///
/// Every operation takes the acting user's id; entries belonging to other
/// users are never returned.
#[async_trait]
pub trait PasswordEntryService: Send + Sync {
    /// Validate input, encrypt the password and store a new entry
    async fn create_entry(
        &self,
        user_id: &str,
        input: NewPasswordEntry,
    ) -> AppResult<Versioned<PasswordEntry>>;

    /// Get one of the user's entries
    async fn get_entry(
        &self,
        id: &PasswordEntryId,
        user_id: &str,
    ) -> AppResult<Versioned<PasswordEntry>>;

    /// List all of the user's entries, oldest first
    async fn list_entries(&self, user_id: &str) -> AppResult<Vec<Versioned<PasswordEntry>>>;

    /// List the user's entries matching a filter
    async fn search_entries(
        &self,
        user_id: &str,
        filter: &EntryFilter,
    ) -> AppResult<Vec<Versioned<PasswordEntry>>>;

    /// Apply a partial update through the owner-gated mutators
    async fn update_entry(
        &self,
        id: &PasswordEntryId,
        user_id: &str,
        changes: UpdatePasswordEntry,
    ) -> AppResult<Versioned<PasswordEntry>>;

    /// Decrypt and return the stored password
    async fn reveal_password(&self, id: &PasswordEntryId, user_id: &str) -> AppResult<String>;

    /// Delete one of the user's entries
    async fn delete_entry(&self, id: &PasswordEntryId, user_id: &str) -> AppResult<()>;
}

/// Concrete implementation of PasswordEntryService using the domain ports.
pub struct PasswordEntryManager {
    repo: Arc<dyn PasswordEntryRepository>,
    encryption: Arc<dyn EncryptionService>,
}

impl PasswordEntryManager {
    /// Create new service instance with repository and cipher
    pub fn new(
        repo: Arc<dyn PasswordEntryRepository>,
        encryption: Arc<dyn EncryptionService>,
    ) -> Self {
        Self { repo, encryption }
    }
}

/// Value objects parsed from an update request, before any entry is loaded.
struct ValidatedChanges {
    site_name: Option<SiteName>,
    site_url: Option<SiteUrl>,
    username: Option<Username>,
    category: Option<Category>,
    notes: Option<Notes>,
    tags: Option<Tags>,
}

impl ValidatedChanges {
    fn parse(changes: &UpdatePasswordEntry) -> AppResult<Self> {
        Ok(Self {
            site_name: changes.site_name.as_deref().map(SiteName::new).transpose()?,
            site_url: changes.site_url.as_deref().map(SiteUrl::new).transpose()?,
            username: changes.username.as_deref().map(Username::new).transpose()?,
            category: changes
                .category
                .as_deref()
                .map(Category::from_string)
                .transpose()?,
            notes: changes.notes.as_deref().map(Notes::new).transpose()?,
            tags: changes.tags.as_ref().map(Tags::from_strings).transpose()?,
        })
    }
}

#[async_trait]
impl PasswordEntryService for PasswordEntryManager {
    async fn create_entry(
        &self,
        user_id: &str,
        input: NewPasswordEntry,
    ) -> AppResult<Versioned<PasswordEntry>> {
        let site_name = SiteName::new(&input.site_name)?;
        let username = Username::new(&input.username)?;
        let category = Category::from_string(&input.category)?;
        let site_url = SiteUrl::from_optional(input.site_url.as_deref())?;
        let notes = Notes::from_optional(input.notes.as_deref())?;
        let tags = Tags::from_strings(&input.tags)?;

        let encrypted_password = self.encryption.encrypt(&input.password, user_id)?;

        let entry = PasswordEntry::create(
            user_id,
            site_name,
            username,
            encrypted_password,
            category,
            Some(site_url),
            Some(notes),
            Some(tags),
        );

        let version = self.repo.insert(&entry).await?;
        info!(entry_id = %entry.id(), user_id = %user_id, "Password entry created");

        Ok(Versioned::new(entry, version))
    }

    async fn get_entry(
        &self,
        id: &PasswordEntryId,
        user_id: &str,
    ) -> AppResult<Versioned<PasswordEntry>> {
        debug!(entry_id = %id, user_id = %user_id, "Fetching password entry");
        self.repo
            .find_by_id_for_user(id, user_id)
            .await?
            .ok_or_not_found()
    }

    async fn list_entries(&self, user_id: &str) -> AppResult<Vec<Versioned<PasswordEntry>>> {
        debug!(user_id = %user_id, "Listing password entries");
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn search_entries(
        &self,
        user_id: &str,
        filter: &EntryFilter,
    ) -> AppResult<Vec<Versioned<PasswordEntry>>> {
        let entries = self.repo.find_by_user(user_id).await?;
        let matched: Vec<_> = entries
            .into_iter()
            .filter(|entry| filter.matches(&entry.value))
            .collect();

        debug!(user_id = %user_id, matched = matched.len(), "Searched password entries");
        Ok(matched)
    }

    async fn update_entry(
        &self,
        id: &PasswordEntryId,
        user_id: &str,
        changes: UpdatePasswordEntry,
    ) -> AppResult<Versioned<PasswordEntry>> {
        // Reject bad input before touching storage
        let validated = ValidatedChanges::parse(&changes)?;

        let Versioned {
            value: mut entry,
            version,
        } = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        if let Err(e) = entry.ensure_belongs_to_user(user_id) {
            warn!(entry_id = %id, user_id = %user_id, "Rejected update by non-owner");
            return Err(e.into());
        }

        if changes.is_empty() {
            return Ok(Versioned::new(entry, version));
        }

        if let Some(site_name) = validated.site_name {
            entry.update_site_name(site_name, user_id)?;
        }
        if let Some(site_url) = validated.site_url {
            entry.update_site_url(site_url, user_id)?;
        }
        if let Some(username) = validated.username {
            entry.update_username(username, user_id)?;
        }
        if let Some(password) = changes.password.as_deref() {
            let encrypted = self.encryption.encrypt(password, user_id)?;
            entry.update_password(encrypted, user_id)?;
        }
        if let Some(category) = validated.category {
            entry.update_category(category, user_id)?;
        }
        if let Some(notes) = validated.notes {
            entry.update_notes(notes, user_id)?;
        }
        if let Some(tags) = validated.tags {
            entry.update_tags(tags, user_id)?;
        }

        let expected_version = changes.expected_version.unwrap_or(version);
        let new_version = match self.repo.update(&entry, expected_version).await {
            Ok(v) => v,
            Err(e @ RepositoryError::VersionConflict { .. }) => {
                warn!(entry_id = %id, user_id = %user_id, "Concurrent update detected");
                return Err(AppError::from(e));
            }
            Err(e) => return Err(missing_as_not_found(e)),
        };

        info!(
            entry_id = %id,
            user_id = %user_id,
            version = new_version,
            "Password entry updated"
        );
        Ok(Versioned::new(entry, new_version))
    }

    async fn reveal_password(&self, id: &PasswordEntryId, user_id: &str) -> AppResult<String> {
        let entry = self.get_entry(id, user_id).await?.into_inner();
        let plaintext = self
            .encryption
            .decrypt(entry.encrypted_password(), entry.user_id())?;

        info!(entry_id = %id, user_id = %user_id, "Password revealed");
        Ok(plaintext)
    }

    async fn delete_entry(&self, id: &PasswordEntryId, user_id: &str) -> AppResult<()> {
        match self.repo.delete(id, user_id).await {
            Ok(()) => {
                info!(entry_id = %id, user_id = %user_id, "Password entry deleted");
                Ok(())
            }
            Err(e) => Err(missing_as_not_found(e)),
        }
    }
}

/// An entry that vanished is reported like one that never existed; every
/// other port error passes through unchanged.
fn missing_as_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound(_) => AppError::NotFound,
        other => other.into(),
    }
}
