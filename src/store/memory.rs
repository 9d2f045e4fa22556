//! In-process key-value backend.

use super::{KeyValueStore, Lookup, StoreError};
use std::collections::HashMap;

/// Map-backed store with an optional byte quota over keys and values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses batches pushing it past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Total bytes held across keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn update(
        &mut self,
        apply: &mut dyn FnMut(Lookup<'_>) -> Result<Vec<(String, String)>, StoreError>,
    ) -> Result<(), StoreError> {
        let writes = apply(&|key: &str| self.entries.get(key).cloned())?;

        let mut staged = self.entries.clone();
        staged.extend(writes);
        if let Some(quota) = self.quota {
            let needed: usize = staged.iter().map(|(k, v)| k.len() + v.len()).sum();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }

        self.entries = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut store = MemoryStore::new();
        store
            .put_batch(&[("a".into(), "1".into()), ("b".into(), "2".into())])
            .unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("missing").unwrap(), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.used_bytes(), 4);
    }

    #[test]
    fn test_quota_rejects_whole_batch() {
        let mut store = MemoryStore::with_quota(6);
        store.put_batch(&[("a".into(), "12".into())]).unwrap();

        let err = store
            .put_batch(&[("a".into(), "1".into()), ("b".into(), "12345".into())])
            .unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 8, quota: 6 }));
        assert_eq!(store.get("a").unwrap().as_deref(), Some("12"));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_update_sees_current_values() {
        let mut store = MemoryStore::new();
        store.put_batch(&[("count".into(), "1".into())]).unwrap();

        store
            .update(&mut |lookup| {
                let n: u32 = lookup("count").unwrap_or_default().parse().unwrap();
                Ok(vec![("count".into(), (n + 1).to_string())])
            })
            .unwrap();
        assert_eq!(store.get("count").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let mut store = MemoryStore::new();
        let result = store.update(&mut |_| Err(StoreError::NotFound("x".into())));

        assert!(result.is_err());
        assert!(store.is_empty());
    }
}
