//! JSON-file key-value backend.
//!
//! The whole store is a single JSON object. Writes go to a sibling
//! temporary file which is then renamed over the original, so readers see
//! either the old or the new contents. Every read goes to disk, and updates
//! hold an exclusive lock on a sibling `.lock` file while they re-read,
//! apply and write, so several handles (or processes) can share one store.

use super::{KeyValueStore, Lookup, StoreError};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// File-backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };

        let entries = store.load()?;
        tracing::debug!(path = %store.path.display(), keys = entries.len(), "Opened file store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn update(
        &mut self,
        apply: &mut dyn FnMut(Lookup<'_>) -> Result<Vec<(String, String)>, StoreError>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock.write()?;

        let mut entries = self.load()?;
        let writes = apply(&|key: &str| entries.get(key).cloned())?;
        entries.extend(writes);

        self.write(&entries)?;
        tracing::debug!(path = %self.path.display(), keys = entries.len(), "Wrote file store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store
            .put_batch(&[("user123".into(), "{}".into()), ("k".into(), "v".into())])
            .unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("user123").unwrap().as_deref(), Some("{}"));
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_failed_write_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.put_batch(&[("a".into(), "1".into())]).unwrap();

        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(store.put_batch(&[("a".into(), "2".into())]).is_err());

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_handles_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();

        first.put_batch(&[("a".into(), "1".into())]).unwrap();
        second.put_batch(&[("b".into(), "2".into())]).unwrap();

        assert_eq!(first.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(second.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut store = FileStore::open(&path).unwrap();
                    for _ in 0..10 {
                        store
                            .update(&mut |lookup| {
                                let n: u32 = lookup("count").map_or(0, |v| v.parse().unwrap());
                                Ok(vec![("count".into(), (n + 1).to_string())])
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("count").unwrap().as_deref(), Some("40"));
    }
}
