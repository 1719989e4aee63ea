//! Durable Local Storage
//!
//! Whole-record key/value persistence. Each record is read and written as a
//! single string; there are no partial updates at this layer.

use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Record key holding `{apiKeys, selectedModel, passwordHash}`
pub const CONFIG_RECORD: &str = "apiConfiguration";
/// Record key holding the full quick-prompt list
pub const PROMPTS_RECORD: &str = "quickPrompts";

#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Read a record, `None` if it was never written
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Replace a record
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// One JSON file per record inside a data directory
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(AppError::Storage(format!("invalid record key: {:?}", key)));
        }
        Ok(self.base_dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.record_path(key)?;
        fs::create_dir_all(&self.base_dir).await?;

        // Write to a sibling file first so a crash never leaves half a record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!("Wrote record {} to {:?}", key, path);
        Ok(())
    }
}

/// In-process storage, nothing survives the process
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one record
    pub fn with_record(key: &str, value: &str) -> Self {
        let mut records = HashMap::new();
        records.insert(key.to_string(), value.to_string());
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.records
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.get(CONFIG_RECORD).await.unwrap(), None);

        storage.set(CONFIG_RECORD, "{\"a\":1}").await.unwrap();
        assert_eq!(
            storage.get(CONFIG_RECORD).await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(temp_dir.path().join("nested/apiConfiguration.json").exists());

        storage.set(CONFIG_RECORD, "{}").await.unwrap();
        assert_eq!(storage.get(CONFIG_RECORD).await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_file_storage_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.get("../escape").await.is_err());
        assert!(storage.set(".settings_key", "x").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::with_record(PROMPTS_RECORD, "[]");
        assert_eq!(storage.get(PROMPTS_RECORD).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.get(CONFIG_RECORD).await.unwrap(), None);

        storage.set(CONFIG_RECORD, "{}").await.unwrap();
        assert!(storage.get(CONFIG_RECORD).await.unwrap().is_some());
    }
}
