use thiserror::Error;

/// Failures of a dispatch call. `Display` is the user-facing message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Invalid API key, please check your key settings")]
    InvalidApiKey,

    #[error("Too many requests, please try again later")]
    RateLimited,

    #[error("Request timed out, please check your network connection or try again later")]
    Timeout,

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("Failed to parse provider response: {0}")]
    Decode(String),
}

impl DispatchError {
    /// Non-2xx response, with the error message from the body when there was one
    pub fn from_status(status: u16, body_message: Option<String>) -> Self {
        match status {
            401 => DispatchError::InvalidApiKey,
            429 => DispatchError::RateLimited,
            _ => {
                let message = body_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("API request failed with status code: {}", status));
                classify_message(&message)
                    .unwrap_or(DispatchError::Provider { status, message })
            }
        }
    }

}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        // The URL is dropped so the host or path never leaks into the message
        let e = e.without_url();
        if e.is_timeout() {
            return DispatchError::Timeout;
        }
        if e.is_decode() {
            return DispatchError::Decode(e.to_string());
        }
        if let Some(status) = e.status() {
            return DispatchError::from_status(status.as_u16(), None);
        }
        DispatchError::Transport(e.to_string())
    }
}

/// Providers sometimes only report the condition inside the error body
pub fn classify_message(message: &str) -> Option<DispatchError> {
    if message.contains("401") {
        Some(DispatchError::InvalidApiKey)
    } else if message.contains("429") {
        Some(DispatchError::RateLimited)
    } else if message.to_lowercase().contains("timeout") {
        Some(DispatchError::Timeout)
    } else {
        None
    }
}
