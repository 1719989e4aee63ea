// Built-in model catalog

use serde::Serialize;

/// Vendor behind a model
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Google,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Anthropic => write!(f, "Anthropic"),
            Provider::Google => write!(f, "Google"),
        }
    }
}

impl Provider {
    /// Header scheme the provider's gateway expects
    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            Provider::OpenAI => AuthScheme::Bearer,
            Provider::Anthropic => AuthScheme::AnthropicKey,
            Provider::Google => AuthScheme::GoogleKey,
        }
    }
}

/// How the API key is attached to outgoing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>`
    AnthropicKey,
    /// `x-google-api-key: <key>`
    GoogleKey,
}

impl AuthScheme {
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Authorization",
            AuthScheme::AnthropicKey => "x-api-key",
            AuthScheme::GoogleKey => "x-google-api-key",
        }
    }

    pub fn header_value(&self, api_key: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {}", api_key),
            AuthScheme::AnthropicKey | AuthScheme::GoogleKey => api_key.to_string(),
        }
    }
}

/// A selectable generation model
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AIModel {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: Provider,
    pub description: &'static str,
    pub is_default: bool,
}

pub const GPT_4O: &str = "gpt-4o";
pub const GPT_35_TURBO: &str = "gpt-3.5-turbo";
pub const CLAUDE_3_OPUS: &str = "claude-3-opus";
pub const GEMINI_PRO: &str = "gemini-pro";

pub static MODELS: [AIModel; 4] = [
    AIModel {
        id: GPT_4O,
        name: "GPT-4o",
        provider: Provider::OpenAI,
        description: "Powerful multimodal model for complex content generation and understanding",
        is_default: true,
    },
    AIModel {
        id: GPT_35_TURBO,
        name: "GPT-3.5 Turbo",
        provider: Provider::OpenAI,
        description: "Balances quality and speed, suited to everyday copywriting",
        is_default: false,
    },
    AIModel {
        id: CLAUDE_3_OPUS,
        name: "Claude 3 Opus",
        provider: Provider::Anthropic,
        description: "Strong at long-form and creative content; needs a valid API key",
        is_default: false,
    },
    AIModel {
        id: GEMINI_PRO,
        name: "Gemini Pro",
        provider: Provider::Google,
        description: "Multimodal model with strong image and text interplay; needs a valid API key",
        is_default: false,
    },
];

pub fn all_models() -> &'static [AIModel] {
    &MODELS
}

pub fn find_model(id: &str) -> Option<&'static AIModel> {
    MODELS.iter().find(|m| m.id == id)
}

/// The model flagged as default, or the first one in the catalog
pub fn default_model() -> &'static AIModel {
    MODELS.iter().find(|m| m.is_default).unwrap_or(&MODELS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<&str> = MODELS.iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), MODELS.len());
    }

    #[test]
    fn test_default_model() {
        assert_eq!(default_model().id, GPT_4O);
        assert_eq!(MODELS.iter().filter(|m| m.is_default).count(), 1);
    }

    #[test]
    fn test_find_model() {
        assert_eq!(find_model("claude-3-opus").map(|m| m.provider), Some(Provider::Anthropic));
        assert!(find_model("gpt-5").is_none());
    }

    #[test]
    fn test_auth_headers() {
        assert_eq!(AuthScheme::Bearer.header_value("k"), "Bearer k");
        assert_eq!(AuthScheme::AnthropicKey.header_name(), "x-api-key");
        assert_eq!(AuthScheme::GoogleKey.header_value("k"), "k");
    }
}
