//! In-memory password entry store with optimistic concurrency.
//!
//! Records are kept in their persisted (primitive) form and rebuilt through
//! [`PasswordEntry::from_primitives`] on every read. The whole store can be
//! dumped to and restored from a JSON snapshot file. Saving re-reads the file
//! under an exclusive [`SnapshotLock`] and refuses to overwrite entries that
//! another writer changed since they were loaded.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use domain::{
    PasswordEntry, PasswordEntryId, PasswordEntryPrimitives, PasswordEntryRepository,
    RepositoryError, RepositoryResult, Versioned, INITIAL_VERSION,
};

/// One stored entry: its persisted projection plus the CAS version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub version: u64,
    pub entry: PasswordEntryPrimitives,
}

impl StoredRecord {
    fn to_versioned(&self) -> RepositoryResult<Versioned<PasswordEntry>> {
        let entry = PasswordEntry::from_primitives(self.entry.clone())?;
        Ok(Versioned::new(entry, self.version))
    }
}

/// Serialized form of the whole store
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    entries: Vec<StoredRecord>,
}

type Records = HashMap<String, StoredRecord>;

fn unavailable(action: &str, path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("{action} {}: {err}", path.display()))
}

/// Exclusive advisory lock on the `.lock` file next to a snapshot.
///
/// Hold it across a whole load, mutate and save cycle so that two
/// processes cannot interleave. Released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
}

impl SnapshotLock {
    /// Wait until the lock for `snapshot` is free, then take it.
    pub async fn acquire(snapshot: &Path) -> RepositoryResult<Self> {
        let path = snapshot.with_extension("lock");

        tokio::task::spawn_blocking(move || {
            let file = File::create(&path)
                .map_err(|e| unavailable("create", &path, e))?;
            file.lock_exclusive()
                .map_err(|e| unavailable("lock", &path, e))?;
            tracing::debug!(path = %path.display(), "Acquired snapshot lock");
            Ok(Self { file })
        })
        .await
        .map_err(|e| RepositoryError::Unavailable(format!("lock task: {e}")))?
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Concrete implementation of PasswordEntryRepository held in memory
#[derive(Debug, Default)]
pub struct InMemoryPasswordEntryStore {
    records: RwLock<Records>,
    /// Versions as last read from or written to the snapshot file
    persisted: Mutex<HashMap<String, u64>>,
}

impl InMemoryPasswordEntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records(records: Records) -> Self {
        Self {
            persisted: Mutex::new(versions_of(&records)),
            records: RwLock::new(records),
        }
    }

    /// Restore a store from a JSON snapshot.
    ///
    /// # Errors
    /// `Corrupted` when the JSON is malformed, an id appears twice, or any
    /// record fails to reconstruct into a valid entry.
    pub fn from_snapshot_json(json: &str) -> RepositoryResult<Self> {
        Ok(Self::with_records(parse_snapshot(json)?))
    }

    /// Dump the store as pretty JSON, ordered by creation time.
    pub async fn snapshot_json(&self) -> RepositoryResult<String> {
        encode_snapshot(&*self.records.read().await)
    }

    /// Load a snapshot file, or start empty if it does not exist yet.
    pub async fn load_file(path: &Path) -> RepositoryResult<Self> {
        match read_snapshot_file(path).await? {
            Some(records) => {
                tracing::debug!(path = %path.display(), "Loaded entry snapshot");
                Ok(Self::with_records(records))
            }
            None => {
                tracing::info!(path = %path.display(), "No snapshot found, starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Take the snapshot lock and save. See [`Self::save_file_locked`].
    pub async fn save_file(&self, path: &Path) -> RepositoryResult<()> {
        let lock = SnapshotLock::acquire(path).await?;
        self.save_file_locked(path, &lock).await
    }

    /// Merge this store's changes into the snapshot at `path`.
    ///
    /// Entries this store inserted, updated or deleted since they were
    /// loaded must still have the loaded version on disk; everything else
    /// on disk is kept as is. After a successful save the store mirrors the
    /// file.
    ///
    /// # Errors
    /// `VersionConflict` if another writer updated one of the changed
    /// entries, `AlreadyExists` or `NotFound` if it inserted or removed one.
    pub async fn save_file_locked(
        &self,
        path: &Path,
        _lock: &SnapshotLock,
    ) -> RepositoryResult<()> {
        let mut records = self.records.write().await;
        let mut persisted = self.persisted.lock().await;
        let mut merged = read_snapshot_file(path).await?.unwrap_or_default();

        for (id, record) in records.iter() {
            let loaded = persisted.get(id).copied();
            if loaded == Some(record.version) {
                continue;
            }
            ensure_unchanged_on_disk(id, loaded, merged.get(id).map(|r| r.version))?;
            merged.insert(id.clone(), record.clone());
        }

        for (id, &loaded) in persisted.iter() {
            if records.contains_key(id) {
                continue;
            }
            ensure_unchanged_on_disk(id, Some(loaded), merged.get(id).map(|r| r.version))?;
            merged.remove(id);
        }

        let json = encode_snapshot(&merged)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| unavailable("write", &tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| unavailable("rename", path, e))?;

        *persisted = versions_of(&merged);
        *records = merged;

        tracing::debug!(path = %path.display(), "Saved entry snapshot");
        Ok(())
    }

    /// Number of stored entries across all users
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn parse_snapshot(json: &str) -> RepositoryResult<Records> {
    let snapshot: Snapshot = serde_json::from_str(json)
        .map_err(|e| RepositoryError::Corrupted(format!("snapshot: {e}")))?;

    let mut records = HashMap::with_capacity(snapshot.entries.len());
    for record in snapshot.entries {
        // Reject bad data at load time rather than on first read
        record.to_versioned()?;
        let id = record.entry.id.clone();
        if records.insert(id.clone(), record).is_some() {
            return Err(RepositoryError::Corrupted(format!(
                "snapshot lists entry {id} more than once"
            )));
        }
    }
    Ok(records)
}

fn encode_snapshot(records: &Records) -> RepositoryResult<String> {
    let mut entries: Vec<StoredRecord> = records.values().cloned().collect();
    entries.sort_by(|a, b| {
        a.entry
            .created_at
            .cmp(&b.entry.created_at)
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });

    serde_json::to_string_pretty(&Snapshot { entries })
        .map_err(|e| RepositoryError::Unavailable(format!("snapshot encode: {e}")))
}

async fn read_snapshot_file(path: &Path) -> RepositoryResult<Option<Records>> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => parse_snapshot(&json).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(unavailable("read", path, e)),
    }
}

fn versions_of(records: &Records) -> HashMap<String, u64> {
    records
        .iter()
        .map(|(id, record)| (id.clone(), record.version))
        .collect()
}

fn ensure_unchanged_on_disk(
    id: &str,
    loaded: Option<u64>,
    on_disk: Option<u64>,
) -> RepositoryResult<()> {
    match (loaded, on_disk) {
        (Some(expected), Some(actual)) if expected != actual => {
            Err(RepositoryError::VersionConflict {
                id: id.to_string(),
                expected,
                actual,
            })
        }
        (None, Some(_)) => Err(RepositoryError::AlreadyExists(id.to_string())),
        (Some(_), None) => Err(RepositoryError::NotFound(id.to_string())),
        _ => Ok(()),
    }
}

#[async_trait]
impl PasswordEntryRepository for InMemoryPasswordEntryStore {
    async fn insert(&self, entry: &PasswordEntry) -> RepositoryResult<u64> {
        let mut records = self.records.write().await;
        let key = entry.id().to_string();

        if records.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists(key));
        }

        records.insert(
            key,
            StoredRecord {
                version: INITIAL_VERSION,
                entry: entry.to_primitives(),
            },
        );
        Ok(INITIAL_VERSION)
    }

    async fn update(
        &self,
        entry: &PasswordEntry,
        expected_version: u64,
    ) -> RepositoryResult<u64> {
        let mut records = self.records.write().await;
        let key = entry.id().to_string();

        let record = records
            .get_mut(&key)
            .ok_or_else(|| RepositoryError::NotFound(key.clone()))?;

        if record.version != expected_version {
            return Err(RepositoryError::VersionConflict {
                id: key,
                expected: expected_version,
                actual: record.version,
            });
        }

        record.version += 1;
        record.entry = entry.to_primitives();
        Ok(record.version)
    }

    async fn find_by_id(
        &self,
        id: &PasswordEntryId,
    ) -> RepositoryResult<Option<Versioned<PasswordEntry>>> {
        let records = self.records.read().await;
        records
            .get(id.as_str())
            .map(StoredRecord::to_versioned)
            .transpose()
    }

    async fn find_by_id_for_user(
        &self,
        id: &PasswordEntryId,
        user_id: &str,
    ) -> RepositoryResult<Option<Versioned<PasswordEntry>>> {
        let records = self.records.read().await;
        records
            .get(id.as_str())
            .filter(|record| record.entry.user_id == user_id)
            .map(StoredRecord::to_versioned)
            .transpose()
    }

    async fn find_by_user(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Vec<Versioned<PasswordEntry>>> {
        let records = self.records.read().await;
        let mut owned: Vec<&StoredRecord> = records
            .values()
            .filter(|record| record.entry.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            a.entry
                .created_at
                .cmp(&b.entry.created_at)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });

        owned.into_iter().map(StoredRecord::to_versioned).collect()
    }

    async fn delete(&self, id: &PasswordEntryId, user_id: &str) -> RepositoryResult<()> {
        let mut records = self.records.write().await;

        let owned = records
            .get(id.as_str())
            .map_or(false, |record| record.entry.user_id == user_id);

        if !owned {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        records.remove(id.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Category, EncryptedPassword, SiteName, Tags, Username};

    fn create_test_entry(user_id: &str, site: &str) -> PasswordEntry {
        PasswordEntry::create(
            user_id,
            SiteName::new(site).unwrap(),
            Username::new("user@example.com").unwrap(),
            EncryptedPassword::new(&"e".repeat(64)).unwrap(),
            Category::Personal,
            None,
            None,
            Some(Tags::from_strings(["b", "a"]).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryPasswordEntryStore::new();
        let entry = create_test_entry("U1", "Google");

        let version = store.insert(&entry).await.unwrap();
        assert_eq!(version, INITIAL_VERSION);

        let found = store.find_by_id(entry.id()).await.unwrap().unwrap();
        assert_eq!(found.version, INITIAL_VERSION);
        assert_eq!(found.value.to_primitives(), entry.to_primitives());
    }

    #[tokio::test]
    async fn test_insert_duplicate_rejected() {
        let store = InMemoryPasswordEntryStore::new();
        let entry = create_test_entry("U1", "Google");
        store.insert(&entry).await.unwrap();

        let result = store.insert(&entry).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_compare_and_swap() {
        let store = InMemoryPasswordEntryStore::new();
        let mut entry = create_test_entry("U1", "Google");
        store.insert(&entry).await.unwrap();

        entry
            .update_site_name(SiteName::new("GitHub").unwrap(), "U1")
            .unwrap();
        let version = store.update(&entry, INITIAL_VERSION).await.unwrap();
        assert_eq!(version, 2);

        // A writer still holding version 1 loses
        let stale = store.update(&entry, INITIAL_VERSION).await;
        assert!(matches!(
            stale,
            Err(RepositoryError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));

        let found = store.find_by_id(entry.id()).await.unwrap().unwrap();
        assert_eq!(found.value.site_name().as_str(), "GitHub");
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let store = InMemoryPasswordEntryStore::new();
        let entry = create_test_entry("U1", "Google");

        let result = store.update(&entry, INITIAL_VERSION).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_for_user_hides_other_users_entries() {
        let store = InMemoryPasswordEntryStore::new();
        let entry = create_test_entry("U1", "Google");
        store.insert(&entry).await.unwrap();

        assert!(store
            .find_by_id_for_user(entry.id(), "U1")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_id_for_user(entry.id(), "U2")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_filters_and_orders() {
        let store = InMemoryPasswordEntryStore::new();
        let first = create_test_entry("U1", "First");
        let other = create_test_entry("U2", "Other");
        let second = create_test_entry("U1", "Second");
        for entry in [&first, &other, &second] {
            store.insert(entry).await.unwrap();
        }

        let entries = store.find_by_user("U1").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.value.belongs_to_user("U1")));
        assert!(entries[0].value.created_at() <= entries[1].value.created_at());
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = InMemoryPasswordEntryStore::new();
        let entry = create_test_entry("U1", "Google");
        store.insert(&entry).await.unwrap();

        let result = store.delete(entry.id(), "U2").await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert_eq!(store.len().await, 1);

        store.delete(entry.id(), "U1").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_preserves_versions_and_tag_order() {
        let store = InMemoryPasswordEntryStore::new();
        let mut entry = create_test_entry("U1", "Google");
        store.insert(&entry).await.unwrap();
        entry
            .update_tags(Tags::from_strings(["zeta", "alpha"]).unwrap(), "U1")
            .unwrap();
        store.update(&entry, INITIAL_VERSION).await.unwrap();

        let json = store.snapshot_json().await.unwrap();
        let restored = InMemoryPasswordEntryStore::from_snapshot_json(&json).unwrap();

        let found = restored.find_by_id(entry.id()).await.unwrap().unwrap();
        assert_eq!(found.version, 2);
        assert_eq!(found.value.tags().to_strings(), vec!["zeta", "alpha"]);
        assert_eq!(found.value.to_primitives(), entry.to_primitives());
    }

    #[test]
    fn test_snapshot_with_invalid_record_is_corrupted() {
        let mut primitives = create_test_entry("U1", "Google").to_primitives();
        primitives.site_name = "   ".to_string();
        let json = serde_json::json!({
            "entries": [{ "version": 1, "entry": primitives }]
        })
        .to_string();

        let result = InMemoryPasswordEntryStore::from_snapshot_json(&json);
        assert!(matches!(result, Err(RepositoryError::Corrupted(_))));
    }

    #[test]
    fn test_empty_snapshot() {
        let store = InMemoryPasswordEntryStore::from_snapshot_json(r#"{"entries":[]}"#).unwrap();
        assert!(tokio_test::block_on(store.is_empty()));
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");

        let missing = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        assert!(missing.is_empty().await);

        let entry = create_test_entry("U1", "Google");
        missing.insert(&entry).await.unwrap();
        missing.save_file(&path).await.unwrap();

        let loaded = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        assert_eq!(loaded.len().await, 1);
    }

    #[test]
    fn test_duplicate_id_in_snapshot_is_corrupted() {
        let primitives = create_test_entry("U1", "Google").to_primitives();
        let json = serde_json::json!({
            "entries": [
                { "version": 1, "entry": primitives },
                { "version": 2, "entry": primitives }
            ]
        })
        .to_string();

        let result = InMemoryPasswordEntryStore::from_snapshot_json(&json);
        assert!(matches!(
            result,
            Err(RepositoryError::Corrupted(ref msg)) if msg.contains("more than once")
        ));
    }

    async fn seeded_file(entry: &PasswordEntry) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        let store = InMemoryPasswordEntryStore::new();
        store.insert(entry).await.unwrap();
        store.save_file(&path).await.unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_stale_writer_from_same_file_conflicts_on_save() {
        let entry = create_test_entry("U1", "Google");
        let (_dir, path) = seeded_file(&entry).await;

        let first = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        let second = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();

        let mut renamed = entry.clone();
        renamed
            .update_site_name(SiteName::new("First").unwrap(), "U1")
            .unwrap();
        first.update(&renamed, INITIAL_VERSION).await.unwrap();

        let mut other = entry.clone();
        other
            .update_site_name(SiteName::new("Second").unwrap(), "U1")
            .unwrap();
        second.update(&other, INITIAL_VERSION).await.unwrap();

        first.save_file(&path).await.unwrap();
        let result = second.save_file(&path).await;
        assert!(matches!(
            result,
            Err(RepositoryError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));

        let reloaded = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        let found = reloaded.find_by_id(entry.id()).await.unwrap().unwrap();
        assert_eq!(found.value.site_name().as_str(), "First");
        assert_eq!(found.version, 2);
    }

    #[tokio::test]
    async fn test_disjoint_writers_from_same_file_merge() {
        let entry = create_test_entry("U1", "Google");
        let (_dir, path) = seeded_file(&entry).await;

        let first = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        let second = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();

        let mut renamed = entry.clone();
        renamed
            .update_site_name(SiteName::new("GitHub").unwrap(), "U1")
            .unwrap();
        first.update(&renamed, INITIAL_VERSION).await.unwrap();

        let added = create_test_entry("U2", "Bank");
        second.insert(&added).await.unwrap();

        first.save_file(&path).await.unwrap();
        second.save_file(&path).await.unwrap();

        // The second writer now mirrors the file, including the rename
        let seen = second.find_by_id(entry.id()).await.unwrap().unwrap();
        assert_eq!(seen.version, 2);

        let reloaded = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        assert_eq!(reloaded.len().await, 2);
        let found = reloaded.find_by_id(entry.id()).await.unwrap().unwrap();
        assert_eq!(found.value.site_name().as_str(), "GitHub");
        assert!(reloaded.find_by_id(added.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_of_entry_updated_elsewhere_conflicts() {
        let entry = create_test_entry("U1", "Google");
        let (_dir, path) = seeded_file(&entry).await;

        let updater = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        let deleter = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();

        updater.update(&entry, INITIAL_VERSION).await.unwrap();
        updater.save_file(&path).await.unwrap();

        deleter.delete(entry.id(), "U1").await.unwrap();
        let result = deleter.save_file(&path).await;
        assert!(matches!(result, Err(RepositoryError::VersionConflict { .. })));

        let reloaded = InMemoryPasswordEntryStore::load_file(&path).await.unwrap();
        assert_eq!(reloaded.len().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        let lock_path = path.with_extension("lock");

        let lock = SnapshotLock::acquire(&path).await.unwrap();
        let contender = File::open(&lock_path).unwrap();
        assert!(contender.try_lock_exclusive().is_err());

        drop(lock);
        assert!(contender.try_lock_exclusive().is_ok());
        contender.unlock().unwrap();
    }
}
