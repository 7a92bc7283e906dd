//! File-backed secure store.
//!
//! Entries are kept as one JSON object on disk. Every write goes to a temp
//! file that then replaces the previous one, and on Unix the file is
//! restricted to the owner (`0600`). The in-memory view only changes once the
//! file has been written, so a failed write leaves both untouched.
//!
//! File I/O runs on the calling thread before the returned future is polled.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::BoxFuture;
use crate::error::{ServiceError, ServiceResult};
use crate::store::SecureStore;

const SERVICE: &str = "file-store";

/// [`SecureStore`] persisted to a JSON file.
#[derive(Debug)]
pub struct FileSecureStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSecureStore {
    /// Opens the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> ServiceResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                ServiceError::storage(format!("failed to read store file: {}", e))
                    .with_service(SERVICE)
            })?;
            let entries: BTreeMap<String, String> =
                serde_json::from_str(&content).map_err(|e| {
                    ServiceError::storage(format!("failed to parse store file: {}", e))
                        .with_service(SERVICE)
                })?;
            info!(count = entries.len(), "loaded secure store from {:?}", path);
            entries
        } else {
            debug!("no store file at {:?}", path);
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ServiceError::internal("store lock poisoned").with_service(SERVICE))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ServiceError::storage(format!("failed to create store directory: {}", e))
                    .with_service(SERVICE)
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries).map_err(|e| {
            ServiceError::internal(format!("failed to serialize store: {}", e)).with_service(SERVICE)
        })?;

        fs::write(&temp_path, &content).map_err(|e| {
            ServiceError::storage(format!("failed to write store file: {}", e)).with_service(SERVICE)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                ServiceError::storage(format!("failed to restrict store file: {}", e))
                    .with_service(SERVICE)
            })?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ServiceError::storage(format!("failed to rename store file: {}", e))
                .with_service(SERVICE)
        })?;

        debug!("saved secure store to {:?}", self.path);
        Ok(())
    }

    fn set_sync(&self, key: &str, value: &str) -> ServiceResult<()> {
        let mut entries = self.lock()?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn get_sync(&self, key: &str) -> ServiceResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn delete_sync(&self, key: &str) -> ServiceResult<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }
}

impl SecureStore for FileSecureStore {
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, ServiceResult<()>> {
        let result = self.set_sync(key, value);
        Box::pin(async move { result })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, ServiceResult<Option<String>>> {
        let result = self.get_sync(key);
        Box::pin(async move { result })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, ServiceResult<()>> {
        let result = self.delete_sync(key);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecureStore::open(dir.path().join("store.json")).unwrap();

        assert_eq!(store.get("trip-cal").await.unwrap(), None);

        store.set("trip-cal", "cal-42").await.unwrap();
        assert_eq!(store.get("trip-cal").await.unwrap().as_deref(), Some("cal-42"));

        store.delete("trip-cal").await.unwrap();
        assert_eq!(store.get("trip-cal").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileSecureStore::open(&path).unwrap();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        drop(store);

        let reopened = FileSecureStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn deleting_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileSecureStore::open(&path).unwrap();

        store.delete("nothing-here").await.unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let err = FileSecureStore::open(&path).unwrap_err();
        assert_eq!(err.code(), crate::ServiceErrorCode::Storage);
        assert!(err.message().contains("parse"));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("sub");
        let store = FileSecureStore::open(parent.join("store.json")).unwrap();
        store.set("kept", "cal-0").await.unwrap();

        // A regular file where the directory should be makes every save fail.
        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "").unwrap();

        let err = store.set("trip-cal", "cal-1").await.unwrap_err();
        assert_eq!(err.code(), crate::ServiceErrorCode::Storage);
        assert_eq!(store.get("trip-cal").await.unwrap(), None);

        assert!(store.delete("kept").await.is_err());
        assert_eq!(store.get("kept").await.unwrap().as_deref(), Some("cal-0"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileSecureStore::open(&path).unwrap();
        store.set("k", "v").await.unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
