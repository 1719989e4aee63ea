use super::{default_prompts, PromptCategory, QuickPrompt};
use crate::settings::{LocalStorage, PROMPTS_RECORD};
use crate::types::AppResult;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Ordered, persisted list of quick prompts plus the (unpersisted) edit session
pub struct QuickPromptStore {
    storage: Arc<dyn LocalStorage>,
    prompts: Vec<QuickPrompt>,
    editing: Option<String>,
}

impl QuickPromptStore {
    /// Load the stored list, seeding and persisting the defaults on first run
    pub async fn open(storage: Arc<dyn LocalStorage>) -> Self {
        let mut store = Self {
            storage,
            prompts: Vec::new(),
            editing: None,
        };
        store.load().await;
        store
    }

    async fn load(&mut self) {
        match self.storage.get(PROMPTS_RECORD).await {
            Ok(Some(content)) => match serde_json::from_str::<Vec<QuickPrompt>>(&content) {
                Ok(prompts) => self.prompts = prompts,
                Err(e) => {
                    error!("Failed to parse quick prompts, using defaults: {}", e);
                    self.prompts = default_prompts();
                }
            },
            Ok(None) => {
                info!("No quick prompts stored, seeding defaults");
                self.prompts = default_prompts();
                self.save().await;
            }
            Err(e) => {
                error!("Failed to load quick prompts: {}", e);
                self.prompts = default_prompts();
            }
        }
    }

    async fn save(&self) {
        if let Err(e) = self.try_save().await {
            error!("Failed to save quick prompts: {}", e);
        }
    }

    async fn try_save(&self) -> AppResult<()> {
        let content = serde_json::to_string(&self.prompts)?;
        self.storage.set(PROMPTS_RECORD, &content).await
    }

    /// All prompts in insertion order
    pub fn list(&self) -> &[QuickPrompt] {
        &self.prompts
    }

    pub fn get(&self, id: &str) -> Option<&QuickPrompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn by_category(&self, category: PromptCategory) -> Vec<&QuickPrompt> {
        self.prompts
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Append a prompt. Blank text is ignored and yields `None`.
    pub async fn add(&mut self, text: &str, category: PromptCategory) -> Option<&QuickPrompt> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let prompt = QuickPrompt {
            id: self.next_id(),
            text: text.to_string(),
            category,
        };
        debug!("Adding quick prompt {}", prompt.id);
        self.prompts.push(prompt);
        self.save().await;
        self.prompts.last()
    }

    /// Replace text and category in place. Returns false for blank text or an
    /// unknown id. Ends the edit session on that entry.
    pub async fn update(&mut self, id: &str, text: &str, category: PromptCategory) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let Some(prompt) = self.prompts.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        prompt.text = text.to_string();
        prompt.category = category;

        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        self.save().await;
        true
    }

    /// Remove a prompt. Returns true when the removed entry was being edited
    /// and the edit session has been closed.
    pub async fn delete(&mut self, id: &str) -> bool {
        let before = self.prompts.len();
        self.prompts.retain(|p| p.id != id);
        if self.prompts.len() != before {
            self.save().await;
        }

        if self.editing.as_deref() == Some(id) {
            self.editing = None;
            true
        } else {
            false
        }
    }

    pub fn start_editing(&mut self, id: &str) -> Option<&QuickPrompt> {
        let index = self.prompts.iter().position(|p| p.id == id)?;
        self.editing = Some(id.to_string());
        self.prompts.get(index)
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Prompt currently being edited, if any
    pub fn editing(&self) -> Option<&QuickPrompt> {
        self.editing.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    // Millisecond timestamp, bumped until it no longer collides
    fn next_id(&self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}
