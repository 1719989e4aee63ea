// Adcraft - marketing image and copy generation through third-party AI model APIs

pub mod config;
pub mod dispatch;  // Provider routing, auth headers and failure classification
pub mod models;
pub mod prompts;   // User-editable quick prompts
pub mod settings;  // Selected model, API keys and password gate
pub mod styles;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use dispatch::{DispatchError, Dispatcher};
pub use models::{AIModel, AuthScheme, Provider};
pub use prompts::{PromptCategory, QuickPrompt, QuickPromptStore};
pub use settings::{ConfigStore, FileStorage, LocalStorage, MemoryStorage, SecretCipher};
pub use types::{AppError, AppResult, GenerateRequest, GenerateResponse, GeneratedContent};
pub use utils::mask_api_key;
