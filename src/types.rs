// Type definitions shared across the crate

use serde::{Deserialize, Serialize};

/// A single generation call: prompt text plus optional reference images and style tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub model_id: String,
    pub api_key: String,
    pub prompt: String,
    /// Image data (URLs or `data:` URLs), forwarded untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Style ids from the style catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<String>>,
}

impl GenerateRequest {
    pub fn new(
        model_id: impl Into<String>,
        api_key: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            api_key: api_key.into(),
            prompt: prompt.into(),
            images: None,
            styles: None,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_styles(mut self, styles: Vec<String>) -> Self {
        self.styles = Some(styles);
        self
    }
}

/// What a provider produced. Both fields are optional; an empty value is still a success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GeneratedContent {
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.text.is_none()
    }
}

/// Normalized outcome of a generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<GeneratedContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn ok(data: GeneratedContent) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Encryption error: {0}")]
    Crypto(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_without_absent_fields() {
        let failure = serde_json::to_value(GenerateResponse::failure("boom")).unwrap();
        assert_eq!(failure, serde_json::json!({ "success": false, "error": "boom" }));

        let ok = serde_json::to_value(GenerateResponse::ok(GeneratedContent {
            image_url: Some("https://img/1.png".to_string()),
            text: None,
        }))
        .unwrap();
        assert_eq!(
            ok,
            serde_json::json!({ "success": true, "data": { "imageUrl": "https://img/1.png" } })
        );
    }

    #[test]
    fn test_request_builder() {
        let request = GenerateRequest::new("gpt-4o", "k", "hello")
            .with_styles(vec!["minimal".to_string()]);
        assert_eq!(request.model_id, "gpt-4o");
        assert!(request.images.is_none());
        assert_eq!(request.styles.as_deref(), Some(&["minimal".to_string()][..]));
    }
}
