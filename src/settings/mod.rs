//! Settings Module
//!
//! Local configuration store: the selected model, one API key per model and an
//! optional password that gates edits. Every mutation is written through to
//! durable storage immediately. API keys can be encrypted at rest.

pub mod cipher;
pub mod password;
pub mod storage;

pub use cipher::SecretCipher;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, CONFIG_RECORD, PROMPTS_RECORD};

use crate::models::{self, AIModel};
use crate::types::AppResult;
use crate::utils::mask_api_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// In-memory view of the configuration record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub api_keys: BTreeMap<String, String>,
    pub selected_model: Option<String>,
    pub password_hash: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_keys: BTreeMap::new(),
            selected_model: Some(models::default_model().id.to_string()),
            password_hash: None,
        }
    }
}

/// Record as found in storage. Older records carry a single `apiKey` shared
/// by every model instead of `apiKeys`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    api_keys: Option<BTreeMap<String, String>>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    selected_model: Option<String>,
    #[serde(default)]
    password_hash: Option<String>,
}

/// Per-model key status for display (never exposes the full key)
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    pub model: &'static AIModel,
    pub has_key: bool,
    pub masked_key: String,
}

pub struct ConfigStore {
    storage: Arc<dyn LocalStorage>,
    cipher: Option<SecretCipher>,
    config: Configuration,
}

impl ConfigStore {
    /// Open the store and load whatever is persisted. Never fails: unreadable
    /// state falls back to defaults.
    pub async fn open(storage: Arc<dyn LocalStorage>, cipher: Option<SecretCipher>) -> Self {
        let mut store = Self {
            storage,
            cipher,
            config: Configuration::default(),
        };
        store.load().await;
        store
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn models(&self) -> &'static [AIModel] {
        models::all_models()
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.config.selected_model.as_deref()
    }

    pub async fn set_selected_model(&mut self, model_id: Option<String>) {
        if let Some(id) = &model_id {
            if models::find_model(id).is_none() {
                warn!("Selecting model {} which is not in the catalog", id);
            }
        }
        self.config.selected_model = model_id;
        self.save().await;
    }

    /// Key for a model, empty when unset
    pub fn api_key(&self, model_id: &str) -> &str {
        self.config
            .api_keys
            .get(model_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub async fn set_api_key(&mut self, model_id: &str, value: &str) {
        self.config
            .api_keys
            .insert(model_id.to_string(), value.to_string());
        self.save().await;
    }

    pub fn current_api_key(&self) -> &str {
        match self.selected_model() {
            Some(id) => self.api_key(id),
            None => "",
        }
    }

    /// A model is selected and has a non-empty key
    pub fn is_configured(&self) -> bool {
        self.selected_model().is_some() && !self.current_api_key().is_empty()
    }

    pub fn key_statuses(&self) -> Vec<KeyStatus> {
        models::all_models()
            .iter()
            .map(|model| {
                let key = self.api_key(model.id);
                KeyStatus {
                    model,
                    has_key: !key.is_empty(),
                    masked_key: mask_api_key(key),
                }
            })
            .collect()
    }

    pub fn has_password(&self) -> bool {
        self.config.password_hash.is_some()
    }

    /// Store a hash of the trimmed password; an empty password clears it
    pub async fn set_password(&mut self, plain: &str) -> AppResult<()> {
        let trimmed = plain.trim();
        self.config.password_hash = if trimmed.is_empty() {
            None
        } else {
            Some(password::hash_password(trimmed)?)
        };
        self.save().await;
        Ok(())
    }

    /// Always true when no password is set
    pub fn verify_password(&self, plain: &str) -> bool {
        match &self.config.password_hash {
            None => true,
            Some(hash) => password::verify_password(plain, hash),
        }
    }

    pub async fn reset_password(&mut self) {
        self.config.password_hash = None;
        self.save().await;
    }

    /// Replace in-memory state with the persisted record
    pub async fn load(&mut self) {
        match self.read_record().await {
            Ok(Some((config, migrated))) => {
                self.config = config;
                if migrated {
                    info!("Upgraded stored configuration to the current format");
                    self.save().await;
                }
            }
            Ok(None) => {
                debug!("No stored configuration, using defaults");
                self.config = Configuration::default();
            }
            Err(e) => {
                error!("Failed to load API configuration: {}", e);
                self.config = Configuration::default();
            }
        }
    }

    /// Write the whole record; failures are logged
    pub async fn save(&self) {
        if let Err(e) = self.try_save().await {
            error!("Failed to save API configuration: {}", e);
        }
    }

    pub async fn try_save(&self) -> AppResult<()> {
        let mut record = self.config.clone();
        if let Some(cipher) = &self.cipher {
            for value in record.api_keys.values_mut() {
                if !value.is_empty() {
                    *value = cipher.seal(value)?;
                }
            }
        }

        let content = serde_json::to_string(&record)?;
        self.storage.set(CONFIG_RECORD, &content).await
    }

    /// Parsed record plus whether it needed upgrading
    async fn read_record(&self) -> AppResult<Option<(Configuration, bool)>> {
        let content = match self.storage.get(CONFIG_RECORD).await? {
            Some(content) => content,
            None => return Ok(None),
        };
        let record: StoredRecord = serde_json::from_str(&content)?;
        let mut migrated = false;

        let api_keys = match (record.api_keys, record.api_key) {
            (Some(keys), _) => {
                let (keys, had_plaintext) = self.open_keys(keys);
                migrated |= had_plaintext;
                keys
            }
            (None, Some(shared)) => {
                info!("Fanning legacy shared API key out to every model");
                migrated = true;
                models::all_models()
                    .iter()
                    .map(|m| (m.id.to_string(), shared.clone()))
                    .collect()
            }
            (None, None) => BTreeMap::new(),
        };

        let password_hash = match record.password_hash {
            Some(stored) if password::is_phc_hash(&stored) => Some(stored),
            Some(stored) => {
                migrated = true;
                match password::decode_legacy_hash(&stored) {
                    Some(plain) => Some(password::hash_password(plain.trim())?),
                    None => {
                        warn!("Stored password hash is unreadable, clearing it");
                        None
                    }
                }
            }
            None => None,
        };

        Ok(Some((
            Configuration {
                api_keys,
                selected_model: record.selected_model,
                password_hash,
            },
            migrated,
        )))
    }

    /// Opened keys, plus whether any were stored unsealed and need sealing
    fn open_keys(&self, keys: BTreeMap<String, String>) -> (BTreeMap<String, String>, bool) {
        let cipher = match &self.cipher {
            Some(cipher) => cipher,
            None => return (keys, false),
        };

        let mut had_plaintext = false;
        let opened = keys
            .into_iter()
            .filter_map(|(model_id, value)| {
                if value.is_empty() {
                    return Some((model_id, value));
                }
                if !SecretCipher::is_sealed(&value) {
                    had_plaintext = true;
                    return Some((model_id, value));
                }
                match cipher.open(&value) {
                    Ok(secret) => Some((model_id, secret)),
                    Err(e) => {
                        warn!(
                            "Failed to decrypt API key for {}, it may be corrupted: {}",
                            model_id, e
                        );
                        None
                    }
                }
            })
            .collect();

        if had_plaintext {
            info!("Sealing API keys that were stored in plaintext");
        }
        (opened, had_plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> (Arc<MemoryStorage>, ConfigStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ConfigStore::open(storage.clone(), None).await;
        (storage, store)
    }

    async fn stored_json(storage: &MemoryStorage) -> serde_json::Value {
        let content = storage.get(CONFIG_RECORD).await.unwrap().unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn test_defaults() {
        let (_, store) = memory_store().await;
        assert_eq!(store.selected_model(), Some("gpt-4o"));
        assert_eq!(store.current_api_key(), "");
        assert!(!store.is_configured());
        assert!(!store.has_password());
    }

    #[tokio::test]
    async fn test_set_api_key_writes_through() {
        let (storage, mut store) = memory_store().await;

        store.set_api_key("gpt-4o", "sk-test-key-12345").await;
        assert_eq!(store.api_key("gpt-4o"), "sk-test-key-12345");
        assert_eq!(store.api_key("gemini-pro"), "");
        assert!(store.is_configured());

        let json = stored_json(&storage).await;
        assert_eq!(json["apiKeys"]["gpt-4o"], "sk-test-key-12345");
        assert_eq!(json["selectedModel"], "gpt-4o");
        assert!(json["passwordHash"].is_null());
    }

    #[tokio::test]
    async fn test_current_key_follows_selection() {
        let (_, mut store) = memory_store().await;
        store.set_api_key("claude-3-opus", "sk-ant-1").await;
        assert!(!store.is_configured());

        store.set_selected_model(Some("claude-3-opus".to_string())).await;
        assert_eq!(store.current_api_key(), "sk-ant-1");
        assert!(store.is_configured());

        store.set_selected_model(None).await;
        assert_eq!(store.current_api_key(), "");
        assert!(!store.is_configured());
    }

    #[tokio::test]
    async fn test_empty_key_is_not_configured() {
        let (_, mut store) = memory_store().await;
        store.set_api_key("gpt-4o", "").await;
        assert!(!store.is_configured());
    }

    #[tokio::test]
    async fn test_password_lifecycle() {
        let (storage, mut store) = memory_store().await;
        assert!(store.verify_password("anything"));

        store.set_password("  abc123  ").await.unwrap();
        assert!(store.has_password());
        assert!(store.verify_password("abc123"));
        assert!(!store.verify_password("wrong"));

        let json = stored_json(&storage).await;
        let stored_hash = json["passwordHash"].as_str().unwrap();
        assert!(!stored_hash.contains("abc123"));

        store.set_password("   ").await.unwrap();
        assert!(!store.has_password());
        assert!(store.verify_password("wrong"));

        store.set_password("again").await.unwrap();
        store.reset_password().await;
        assert!(!store.has_password());
    }

    #[tokio::test]
    async fn test_reload_restores_state() {
        let (storage, mut store) = memory_store().await;
        store.set_api_key("gemini-pro", "g-key").await;
        store.set_selected_model(Some("gemini-pro".to_string())).await;
        store.set_password("pw").await.unwrap();

        let reopened = ConfigStore::open(storage, None).await;
        assert_eq!(reopened.selected_model(), Some("gemini-pro"));
        assert_eq!(reopened.current_api_key(), "g-key");
        assert!(reopened.verify_password("pw"));
    }

    #[tokio::test]
    async fn test_legacy_shared_key_fans_out() {
        let storage = Arc::new(MemoryStorage::with_record(
            CONFIG_RECORD,
            r#"{"apiKey":"sk-shared","selectedModel":"gemini-pro"}"#,
        ));
        let store = ConfigStore::open(storage.clone(), None).await;

        for model in models::all_models() {
            assert_eq!(store.api_key(model.id), "sk-shared");
        }
        assert_eq!(store.selected_model(), Some("gemini-pro"));

        // Written back in the current shape
        let json = stored_json(&storage).await;
        assert_eq!(json["apiKeys"]["claude-3-opus"], "sk-shared");
        assert!(json.get("apiKey").is_none());
    }

    #[tokio::test]
    async fn test_legacy_password_is_rehashed() {
        // "abc123" in the old reversible encoding
        let storage = Arc::new(MemoryStorage::with_record(
            CONFIG_RECORD,
            r#"{"apiKeys":{},"selectedModel":"gpt-4o","passwordHash":"YWJjMTIz"}"#,
        ));
        let store = ConfigStore::open(storage.clone(), None).await;

        assert!(store.verify_password("abc123"));
        assert!(!store.verify_password("wrong"));

        let json = stored_json(&storage).await;
        assert!(json["passwordHash"].as_str().unwrap().starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_corrupt_record_falls_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::with_record(CONFIG_RECORD, "{not json"));
        let store = ConfigStore::open(storage, None).await;

        assert_eq!(store.configuration(), &Configuration::default());
    }

    #[tokio::test]
    async fn test_keys_encrypted_at_rest() {
        let storage = Arc::new(MemoryStorage::new());
        let cipher = SecretCipher::random();
        let mut store = ConfigStore::open(storage.clone(), Some(cipher.clone())).await;
        store.set_api_key("gpt-4o", "sk-secret-value").await;

        let json = stored_json(&storage).await;
        let at_rest = json["apiKeys"]["gpt-4o"].as_str().unwrap();
        assert_ne!(at_rest, "sk-secret-value");

        let reopened = ConfigStore::open(storage.clone(), Some(cipher)).await;
        assert_eq!(reopened.api_key("gpt-4o"), "sk-secret-value");

        // A different key cannot read it; the entry is dropped
        let foreign = ConfigStore::open(storage, Some(SecretCipher::random())).await;
        assert_eq!(foreign.api_key("gpt-4o"), "");
    }

    #[tokio::test]
    async fn test_plaintext_keys_survive_and_get_sealed() {
        let storage = Arc::new(MemoryStorage::with_record(
            CONFIG_RECORD,
            r#"{"apiKeys":{"gpt-4o":"sk-plain-key-123456","gemini-pro":""},"selectedModel":"gpt-4o","passwordHash":null}"#,
        ));
        let cipher = SecretCipher::random();
        let mut store = ConfigStore::open(storage.clone(), Some(cipher.clone())).await;

        assert_eq!(store.api_key("gpt-4o"), "sk-plain-key-123456");
        assert!(store.is_configured());

        // Rewritten sealed on open
        let json = stored_json(&storage).await;
        let at_rest = json["apiKeys"]["gpt-4o"].as_str().unwrap();
        assert!(SecretCipher::is_sealed(at_rest));
        assert_eq!(cipher.open(at_rest).unwrap(), "sk-plain-key-123456");
        assert_eq!(json["apiKeys"]["gemini-pro"], "");

        // A later mutation keeps the key
        store.set_selected_model(Some("gemini-pro".to_string())).await;
        let reopened = ConfigStore::open(storage, Some(cipher)).await;
        assert_eq!(reopened.api_key("gpt-4o"), "sk-plain-key-123456");
    }

    #[tokio::test]
    async fn test_key_statuses_are_masked() {
        let (_, mut store) = memory_store().await;
        store.set_api_key("gpt-4o", "sk-test-key-12345").await;

        let statuses = store.key_statuses();
        assert_eq!(statuses.len(), models::all_models().len());

        let gpt = statuses.iter().find(|s| s.model.id == "gpt-4o").unwrap();
        assert!(gpt.has_key);
        assert_eq!(gpt.masked_key, "sk-t*********2345");

        let claude = statuses.iter().find(|s| s.model.id == "claude-3-opus").unwrap();
        assert!(!claude.has_key);
        assert_eq!(claude.masked_key, "");
    }
}
