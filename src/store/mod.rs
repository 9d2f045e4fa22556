//! Durable storage for health records.
//!
//! Records live in a string key-value store:
//! - `healthHistory` holds the shared, append-only history log
//! - `<userId>` holds that user's latest record
//!
//! Both keys are written in one [`KeyValueStore::update`] per save, so a
//! failed save leaves the previous state untouched.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::record::{validate_user_id, HealthRecord, RecordError, HISTORY_KEY};
use thiserror::Error;

/// Errors raised by record storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record found for user '{0}'")]
    NotFound(String),

    #[error("stored value under '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error(transparent)]
    InvalidRecord(#[from] RecordError),
}

/// Read access to current values inside [`KeyValueStore::update`].
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Backend holding string values under string keys.
pub trait KeyValueStore {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read current values and write the entries `apply` returns as one
    /// unit. No other writer on the same backend interleaves, and an error
    /// from `apply` or from the write leaves the store unchanged.
    fn update(
        &mut self,
        apply: &mut dyn FnMut(Lookup<'_>) -> Result<Vec<(String, String)>, StoreError>,
    ) -> Result<(), StoreError>;

    /// Write every entry, or none of them.
    fn put_batch(&mut self, entries: &[(String, String)]) -> Result<(), StoreError> {
        self.update(&mut |_| Ok(entries.to_vec()))
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn update(
        &mut self,
        apply: &mut dyn FnMut(Lookup<'_>) -> Result<Vec<(String, String)>, StoreError>,
    ) -> Result<(), StoreError> {
        (**self).update(apply)
    }
}

/// Latest-record slots plus the shared history log.
#[derive(Debug)]
pub struct RecordStore<S> {
    backend: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Overwrite the user's latest record and append to the history log.
    ///
    /// The log is re-read inside the backend's update, so saves from other
    /// handles on the same backend are never lost.
    pub fn save(&mut self, record: &HealthRecord) -> Result<(), StoreError> {
        validate_user_id(record.user_id())?;

        let latest_json = serde_json::to_string(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut history_len = 0;
        self.backend.update(&mut |lookup| {
            let mut history: Vec<HealthRecord> = match lookup(HISTORY_KEY) {
                Some(json) => decode(HISTORY_KEY, &json)?,
                None => Vec::new(),
            };
            history.push(record.clone());
            history_len = history.len();

            let history_json = serde_json::to_string(&history)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(vec![
                (record.user_id().to_string(), latest_json.clone()),
                (HISTORY_KEY.to_string(), history_json),
            ])
        })?;

        tracing::info!(
            user_id = record.user_id(),
            history_len,
            "Saved health record"
        );
        Ok(())
    }

    /// The most recent record saved for `user_id`.
    pub fn latest(&self, user_id: &str) -> Result<HealthRecord, StoreError> {
        validate_user_id(user_id)?;

        match self.backend.get(user_id)? {
            Some(json) => decode(user_id, &json),
            None => {
                tracing::debug!(user_id, "No latest record");
                Err(StoreError::NotFound(user_id.to_string()))
            }
        }
    }

    /// Every saved record, in insertion order.
    pub fn history(&self) -> Result<Vec<HealthRecord>, StoreError> {
        match self.backend.get(HISTORY_KEY)? {
            Some(json) => decode(HISTORY_KEY, &json),
            None => Ok(Vec::new()),
        }
    }

    /// Records saved for `user_id`, in insertion order.
    pub fn history_for(&self, user_id: &str) -> Result<Vec<HealthRecord>, StoreError> {
        let mut history = self.history()?;
        history.retain(|r| r.user_id() == user_id);
        Ok(history)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

fn decode<T: serde::de::DeserializeOwned>(key: &str, json: &str) -> Result<T, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
