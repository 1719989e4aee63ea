use super::endpoint::{resolve_auth, resolve_endpoint};
use super::error::DispatchError;
use crate::config::{Config, GENERATE_TIMEOUT, PROBE_TIMEOUT};
use crate::types::{GenerateRequest, GenerateResponse, GeneratedContent};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Request body sent to every generation endpoint
#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    styles: Option<&'a [String]>,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_tokens: u32,
    quality: &'static str,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            quality: "standard",
        }
    }
}

/// Routes generation calls to the gateway path and auth header of each model.
/// One attempt per call, no caching.
pub struct Dispatcher {
    client: Client,
    base_url: String,
    generate_timeout: Duration,
    probe_timeout: Duration,
}

impl Dispatcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            generate_timeout: GENERATE_TIMEOUT,
            probe_timeout: PROBE_TIMEOUT,
        }
    }

    /// Override the generation and probe budgets
    pub fn with_timeouts(mut self, generate: Duration, probe: Duration) -> Self {
        self.generate_timeout = generate;
        self.probe_timeout = probe;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content. Every failure is folded into the response.
    pub async fn generate(&self, request: &GenerateRequest) -> GenerateResponse {
        match self.try_generate(request).await {
            Ok(content) => GenerateResponse::ok(content),
            Err(e) => {
                warn!("Content generation failed for {}: {}", request.model_id, e);
                GenerateResponse::failure(e.to_string())
            }
        }
    }

    pub async fn try_generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GeneratedContent, DispatchError> {
        if request.model_id.is_empty() || request.api_key.is_empty() || request.prompt.is_empty() {
            return Err(DispatchError::MissingParameters);
        }

        let endpoint = resolve_endpoint(&self.base_url, &request.model_id);
        let payload = GenerationPayload {
            model: &request.model_id,
            prompt: &request.prompt,
            images: pass_through_images(request.images.as_deref()),
            styles: request.styles.as_deref(),
            parameters: GenerationParameters::default(),
        };

        debug!("POST {} for model {}", endpoint, request.model_id);
        let response = self
            .authorized(self.client.post(&endpoint), &request.api_key, &request.model_id)
            .timeout(self.generate_timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DispatchError::from_status(
                status.as_u16(),
                error_message(&error_text),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DispatchError::Decode(e.to_string()))?;

        let content = extract_content(&body);
        if content.is_empty() {
            info!("Provider returned neither an image nor text for {}", request.model_id);
        }
        Ok(content)
    }

    /// GET `<endpoint>/health`, true on any 2xx
    pub async fn check_connection(&self, api_key: &str, model_id: &str) -> bool {
        match self.probe("health", api_key, model_id).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("API connection check failed: {}", e);
                false
            }
        }
    }

    /// GET `<endpoint>/usage`, the parsed body or `None` on any failure
    pub async fn get_usage(&self, api_key: &str, model_id: &str) -> Option<Value> {
        let response = match self.probe("usage", api_key, model_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch model usage: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to fetch model usage: status {}", status);
            return None;
        }

        match response.json::<Value>().await {
            Ok(usage) => Some(usage),
            Err(e) => {
                warn!("Failed to parse model usage: {}", e);
                None
            }
        }
    }

    async fn probe(
        &self,
        suffix: &str,
        api_key: &str,
        model_id: &str,
    ) -> Result<reqwest::Response, DispatchError> {
        let url = format!("{}/{}", resolve_endpoint(&self.base_url, model_id), suffix);
        debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(&url), api_key, model_id)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.probe_timeout)
            .send()
            .await?;
        Ok(response)
    }

    fn authorized(&self, builder: RequestBuilder, api_key: &str, model_id: &str) -> RequestBuilder {
        let scheme = resolve_auth(model_id);
        builder.header(scheme.header_name(), scheme.header_value(api_key))
    }
}

// Images go out as given; there is no upload or transcoding step yet.
fn pass_through_images(images: Option<&[String]>) -> Option<&[String]> {
    images.filter(|images| !images.is_empty())
}

/// `{"error": "..."}`, `{"error": {"message": "..."}}` or `{"message": "..."}`
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("error") {
        Some(Value::String(message)) => Some(message.as_str()),
        Some(error) => error.get("message").and_then(Value::as_str),
        None => value.get("message").and_then(Value::as_str),
    };
    message.map(str::to_string)
}

/// Accepts fields at the top level or nested under `result`
fn extract_content(body: &Value) -> GeneratedContent {
    GeneratedContent {
        image_url: field(body, "image_url"),
        text: field(body, "text"),
    }
}

fn field(body: &Value, name: &str) -> Option<String> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    non_empty(body.get(name)).or_else(|| non_empty(body.get("result").and_then(|r| r.get(name))))
}
