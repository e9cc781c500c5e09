//! Password entry aggregate root and its persisted projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::PasswordEntryId;
use crate::value_objects::{
    Category, CreatedAt, EncryptedPassword, Notes, SiteName, SiteUrl, Tags, UpdatedAt, Username,
    ValueObject,
};

/// Password entry aggregate - a stored credential owned by one account.
///
/// # Invariants
///
/// - `id`, `user_id` and `created_at` never change after construction
/// - `updated_at >= created_at`, refreshed on every successful mutation
/// - every mutation is gated on the acting user owning the entry
/// - fields are only ever replaced by already-validated value objects
#[derive(Debug, Clone)]
pub struct PasswordEntry {
    id: PasswordEntryId,
    /// Owning account id, kept as an opaque string
    user_id: String,
    site_name: SiteName,
    site_url: SiteUrl,
    username: Username,
    encrypted_password: EncryptedPassword,
    category: Category,
    notes: Notes,
    tags: Tags,
    created_at: CreatedAt,
    updated_at: UpdatedAt,
}

impl PasswordEntry {
    /// Create a new entry with a fresh id and `created_at == updated_at == now`.
    ///
    /// Omitted optional fields default to their empty state.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        user_id: impl Into<String>,
        site_name: SiteName,
        username: Username,
        encrypted_password: EncryptedPassword,
        category: Category,
        site_url: Option<SiteUrl>,
        notes: Option<Notes>,
        tags: Option<Tags>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PasswordEntryId::generate(),
            user_id: user_id.into(),
            site_name,
            site_url: site_url.unwrap_or_else(SiteUrl::empty),
            username,
            encrypted_password,
            category,
            notes: notes.unwrap_or_else(Notes::empty),
            tags: tags.unwrap_or_else(Tags::empty),
            created_at: CreatedAt::new(now),
            updated_at: UpdatedAt::new(now),
        }
    }

    /// Rebuild an entry from its persisted projection.
    ///
    /// Every field goes back through its value-object constructor; timestamps
    /// are restored verbatim.
    ///
    /// # Errors
    /// The value-object error of the first invalid field, or `InvalidTimestamp`
    /// when `updated_at` precedes `created_at`.
    pub fn from_primitives(primitives: PasswordEntryPrimitives) -> DomainResult<Self> {
        let created_at = CreatedAt::new(primitives.created_at);
        let updated_at = UpdatedAt::new(primitives.updated_at);

        if updated_at.value() < created_at.value() {
            return Err(DomainError::InvalidTimestamp(format!(
                "updatedAt {} precedes createdAt {}",
                updated_at, created_at
            )));
        }

        Ok(Self {
            id: PasswordEntryId::new(primitives.id)?,
            user_id: primitives.user_id,
            site_name: SiteName::new(&primitives.site_name)?,
            site_url: SiteUrl::from_optional(primitives.site_url.as_deref())?,
            username: Username::new(&primitives.username)?,
            encrypted_password: EncryptedPassword::new(&primitives.encrypted_password)?,
            category: Category::new(&primitives.category)?,
            notes: Notes::from_optional(primitives.notes.as_deref())?,
            tags: Tags::from_strings(&primitives.tags)?,
            created_at,
            updated_at,
        })
    }

    /// Project to plain primitives for persistence.
    pub fn to_primitives(&self) -> PasswordEntryPrimitives {
        PasswordEntryPrimitives {
            id: self.id.to_string(),
            user_id: self.user_id.clone(),
            site_name: self.site_name.to_primitive(),
            site_url: self.site_url.to_primitive(),
            username: self.username.to_primitive(),
            encrypted_password: self.encrypted_password.to_primitive(),
            category: self.category.to_primitive(),
            notes: self.notes.to_primitive(),
            tags: self.tags.to_primitive(),
            created_at: self.created_at.to_primitive(),
            updated_at: self.updated_at.to_primitive(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &PasswordEntryId {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn site_name(&self) -> &SiteName {
        &self.site_name
    }

    pub fn site_url(&self) -> &SiteUrl {
        &self.site_url
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn encrypted_password(&self) -> &EncryptedPassword {
        &self.encrypted_password
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn created_at(&self) -> CreatedAt {
        self.created_at
    }

    pub fn updated_at(&self) -> UpdatedAt {
        self.updated_at
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Check if the given user owns this entry
    pub fn belongs_to_user(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Fail with `UnauthorizedAccess` unless the given user owns this entry.
    pub fn ensure_belongs_to_user(&self, user_id: &str) -> DomainResult<()> {
        if self.belongs_to_user(user_id) {
            Ok(())
        } else {
            Err(DomainError::unauthorized(self.id.as_str(), user_id))
        }
    }

    // =========================================================================
    // Mutations
    //
    // Each one checks ownership before touching any field, so a rejected call
    // leaves the entry unchanged.
    // =========================================================================

    pub fn update_site_name(&mut self, site_name: SiteName, user_id: &str) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.site_name = site_name;
        self.touch();
        Ok(())
    }

    pub fn update_site_url(&mut self, site_url: SiteUrl, user_id: &str) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.site_url = site_url;
        self.touch();
        Ok(())
    }

    pub fn update_username(&mut self, username: Username, user_id: &str) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.username = username;
        self.touch();
        Ok(())
    }

    /// Replace the stored ciphertext.
    pub fn update_password(
        &mut self,
        encrypted_password: EncryptedPassword,
        user_id: &str,
    ) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.encrypted_password = encrypted_password;
        self.touch();
        Ok(())
    }

    pub fn update_category(&mut self, category: Category, user_id: &str) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.category = category;
        self.touch();
        Ok(())
    }

    pub fn update_notes(&mut self, notes: Notes, user_id: &str) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.notes = notes;
        self.touch();
        Ok(())
    }

    pub fn update_tags(&mut self, tags: Tags, user_id: &str) -> DomainResult<()> {
        self.ensure_belongs_to_user(user_id)?;
        self.tags = tags;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = UpdatedAt::refreshed_from(&self.updated_at);
    }
}

/// Identity equality: two entries are equal when their ids match.
impl PartialEq for PasswordEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PasswordEntry {}

/// Persisted representation of a [`PasswordEntry`].
///
/// Empty `site_url` / `notes` serialize as `null`; tags keep their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordEntryPrimitives {
    pub id: String,
    pub user_id: String,
    pub site_name: String,
    pub site_url: Option<String>,
    pub username: String,
    pub encrypted_password: String,
    pub category: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "U1";
    const INTRUDER: &str = "U2";

    fn create_test_entry() -> PasswordEntry {
        PasswordEntry::create(
            OWNER,
            SiteName::new("Google").unwrap(),
            Username::new("a@b.com").unwrap(),
            EncryptedPassword::new(&"e".repeat(64)).unwrap(),
            Category::from_string("EMAIL").unwrap(),
            None,
            None,
            None,
        )
    }

    #[test]
    fn test_create_sets_defaults() {
        let entry = create_test_entry();

        assert_eq!(entry.user_id(), OWNER);
        assert_eq!(entry.site_name().as_str(), "Google");
        assert_eq!(entry.category(), Category::Email);
        assert!(entry.site_url().is_empty());
        assert!(entry.notes().is_empty());
        assert!(entry.tags().is_empty());
        assert_eq!(entry.created_at().value(), entry.updated_at().value());
    }

    #[test]
    fn test_create_with_optional_fields() {
        let entry = PasswordEntry::create(
            OWNER,
            SiteName::new("GitHub").unwrap(),
            Username::new("octocat").unwrap(),
            EncryptedPassword::new(&"e".repeat(64)).unwrap(),
            Category::Work,
            Some(SiteUrl::new("https://github.com/login").unwrap()),
            Some(Notes::new("work account").unwrap()),
            Some(Tags::from_strings(["dev", "Git"]).unwrap()),
        );

        assert_eq!(entry.site_url().domain().as_deref(), Some("github.com"));
        assert_eq!(entry.notes().value(), Some("work account"));
        assert_eq!(entry.tags().to_strings(), vec!["dev", "git"]);
    }

    #[test]
    fn test_created_ids_differ() {
        let first = create_test_entry();
        let second = create_test_entry();
        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }

    #[test]
    fn test_ownership_checks() {
        let entry = create_test_entry();

        assert!(entry.belongs_to_user(OWNER));
        assert!(!entry.belongs_to_user(INTRUDER));
        assert!(entry.ensure_belongs_to_user(OWNER).is_ok());
        assert!(matches!(
            entry.ensure_belongs_to_user(INTRUDER),
            Err(DomainError::UnauthorizedAccess { .. })
        ));
    }

    #[test]
    fn test_update_by_non_owner_leaves_entry_unchanged() {
        let mut entry = create_test_entry();
        let before = entry.to_primitives();

        let result = entry.update_site_name(SiteName::new("GitHub").unwrap(), INTRUDER);

        assert!(matches!(result, Err(DomainError::UnauthorizedAccess { .. })));
        assert_eq!(entry.site_name().as_str(), "Google");
        assert_eq!(entry.to_primitives(), before);
    }

    #[test]
    fn test_every_mutator_rejects_non_owner() {
        let mut entry = create_test_entry();
        let before = entry.to_primitives();

        let results = [
            entry.update_site_name(SiteName::new("X").unwrap(), INTRUDER),
            entry.update_site_url(SiteUrl::new("https://x.io").unwrap(), INTRUDER),
            entry.update_username(Username::new("x").unwrap(), INTRUDER),
            entry.update_password(EncryptedPassword::new(&"f".repeat(40)).unwrap(), INTRUDER),
            entry.update_category(Category::Other, INTRUDER),
            entry.update_notes(Notes::new("x").unwrap(), INTRUDER),
            entry.update_tags(Tags::from_strings(["x"]).unwrap(), INTRUDER),
        ];

        for result in results {
            assert!(matches!(result, Err(DomainError::UnauthorizedAccess { .. })));
        }
        assert_eq!(entry.to_primitives(), before);
    }

    #[test]
    fn test_owner_updates_bump_updated_at_only() {
        let mut entry = create_test_entry();
        let created_at = entry.created_at();
        let mut last_updated = entry.updated_at();

        entry.update_site_name(SiteName::new("  GitHub ").unwrap(), OWNER).unwrap();
        assert_eq!(entry.site_name().as_str(), "GitHub");
        assert!(entry.updated_at() >= last_updated);
        last_updated = entry.updated_at();

        entry.update_site_url(SiteUrl::new("https://github.com").unwrap(), OWNER).unwrap();
        entry.update_username(Username::new("octocat").unwrap(), OWNER).unwrap();
        entry
            .update_password(EncryptedPassword::new(&"z".repeat(48)).unwrap(), OWNER)
            .unwrap();
        entry.update_category(Category::Work, OWNER).unwrap();
        entry.update_notes(Notes::new("rotated").unwrap(), OWNER).unwrap();
        entry.update_tags(Tags::from_strings(["dev"]).unwrap(), OWNER).unwrap();

        assert!(entry.updated_at() >= last_updated);
        assert!(entry.updated_at().value() >= entry.created_at().value());
        assert_eq!(entry.created_at(), created_at);
        assert_eq!(entry.category(), Category::Work);
        assert_eq!(entry.notes().value(), Some("rotated"));
        assert!(entry.tags().contains("dev"));
    }

    #[test]
    fn test_clearing_optional_fields() {
        let mut entry = create_test_entry();
        entry.update_notes(Notes::new("temp").unwrap(), OWNER).unwrap();
        entry.update_notes(Notes::empty(), OWNER).unwrap();
        entry.update_site_url(SiteUrl::empty(), OWNER).unwrap();

        let primitives = entry.to_primitives();
        assert_eq!(primitives.notes, None);
        assert_eq!(primitives.site_url, None);
    }

    #[test]
    fn test_equality_is_identity_based() {
        let entry = create_test_entry();
        let mut renamed = entry.clone();
        renamed.update_site_name(SiteName::new("Other").unwrap(), OWNER).unwrap();
        assert_eq!(entry, renamed);
    }

    #[test]
    fn test_primitives_round_trip() {
        let entry = PasswordEntry::create(
            OWNER,
            SiteName::new("Bank").unwrap(),
            Username::new("me").unwrap(),
            EncryptedPassword::new(&"c".repeat(60)).unwrap(),
            Category::Finance,
            Some(SiteUrl::new("https://bank.example/login").unwrap()),
            Some(Notes::new("pin in safe\nsecond line").unwrap()),
            Some(Tags::from_strings(["money", "2fa", "bank"]).unwrap()),
        );

        let primitives = entry.to_primitives();
        let restored = PasswordEntry::from_primitives(primitives.clone()).unwrap();

        assert_eq!(restored, entry);
        assert_eq!(restored.to_primitives(), primitives);
    }

    #[test]
    fn test_primitives_serialize_with_camel_case_and_nulls() {
        let primitives = create_test_entry().to_primitives();
        let json = serde_json::to_value(&primitives).unwrap();

        assert_eq!(json["userId"], "U1");
        assert_eq!(json["siteName"], "Google");
        assert_eq!(json["category"], "EMAIL");
        assert!(json["siteUrl"].is_null());
        assert!(json["notes"].is_null());
        assert_eq!(json["tags"], serde_json::json!([]));

        let back: PasswordEntryPrimitives = serde_json::from_value(json).unwrap();
        assert_eq!(back, primitives);
    }

    #[test]
    fn test_from_primitives_rejects_invalid_field() {
        let mut primitives = create_test_entry().to_primitives();
        primitives.category = "GAMES".to_string();

        let result = PasswordEntry::from_primitives(primitives);
        assert!(matches!(result, Err(DomainError::InvalidCategory(_))));
    }

    #[test]
    fn test_from_primitives_rejects_updated_before_created() {
        let mut primitives = create_test_entry().to_primitives();
        primitives.updated_at = primitives.created_at - chrono::Duration::seconds(1);

        let result = PasswordEntry::from_primitives(primitives);
        assert!(matches!(result, Err(DomainError::InvalidTimestamp(_))));
    }
}
