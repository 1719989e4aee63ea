// Endpoint and authentication resolution per model

use crate::models::{self, AuthScheme, CLAUDE_3_OPUS, GEMINI_PRO, GPT_35_TURBO, GPT_4O};

/// Path under the base URL that serves generation for a model
pub fn endpoint_path(model_id: &str) -> &'static str {
    match model_id {
        GPT_4O | GPT_35_TURBO => "openai/generate",
        CLAUDE_3_OPUS => "anthropic/generate",
        GEMINI_PRO => "google/generate",
        _ => "generate",
    }
}

pub fn resolve_endpoint(base_url: &str, model_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint_path(model_id))
}

/// Catalog models use their provider's scheme. Ids outside the catalog are
/// matched on their family prefix, and anything unrecognized gets a bearer token.
pub fn resolve_auth(model_id: &str) -> AuthScheme {
    if let Some(model) = models::find_model(model_id) {
        return model.provider.auth_scheme();
    }

    if model_id.contains("gpt-") {
        AuthScheme::Bearer
    } else if model_id.contains("claude-") {
        AuthScheme::AnthropicKey
    } else if model_id.contains("gemini-") {
        AuthScheme::GoogleKey
    } else {
        AuthScheme::Bearer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let base = "https://gw.example/v1";
        assert_eq!(resolve_endpoint(base, "gpt-4o"), "https://gw.example/v1/openai/generate");
        assert_eq!(resolve_endpoint(base, "gpt-3.5-turbo"), "https://gw.example/v1/openai/generate");
        assert_eq!(resolve_endpoint(base, "claude-3-opus"), "https://gw.example/v1/anthropic/generate");
        assert_eq!(resolve_endpoint(base, "gemini-pro"), "https://gw.example/v1/google/generate");
        assert_eq!(resolve_endpoint(base, "mystery"), "https://gw.example/v1/generate");
        assert_eq!(resolve_endpoint("http://h/", "gpt-4o"), "http://h/openai/generate");
    }

    #[test]
    fn test_unlisted_ids_keep_generic_endpoint() {
        // Only exact catalog ids get a provider route
        assert_eq!(endpoint_path("gpt-4-turbo"), "generate");
        assert_eq!(endpoint_path("claude-3-sonnet"), "generate");
    }

    #[test]
    fn test_auth_for_catalog_models() {
        assert_eq!(resolve_auth("gpt-4o"), AuthScheme::Bearer);
        assert_eq!(resolve_auth("gpt-3.5-turbo"), AuthScheme::Bearer);
        assert_eq!(resolve_auth("claude-3-opus"), AuthScheme::AnthropicKey);
        assert_eq!(resolve_auth("gemini-pro"), AuthScheme::GoogleKey);
    }

    #[test]
    fn test_auth_for_unlisted_models() {
        assert_eq!(resolve_auth("claude-3-haiku"), AuthScheme::AnthropicKey);
        assert_eq!(resolve_auth("gemini-1.5-flash"), AuthScheme::GoogleKey);
        assert_eq!(resolve_auth("gpt-4-turbo"), AuthScheme::Bearer);
        assert_eq!(resolve_auth("llama-3"), AuthScheme::Bearer);
    }
}
