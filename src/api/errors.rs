use serde::Deserialize;
use thiserror::Error;

/// Shown when the API gives us nothing better to say.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, timeout, reset...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status. Validation and
    /// authorization failures land here, with the server's message if any.
    #[error("API rejected request with HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("could not decode API response: {0}")]
    Decode(String),

    #[error("API client misconfigured: {0}")]
    Config(String),
}

impl ApiError {
    /// Text for a user-facing notification: the server's own message when it
    /// sent one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
    error: Option<String>,
}

/// Pull a human message out of an error body. Plain-text bodies are used
/// verbatim; JSON bodies are searched for `message`, `detail` or `error`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed
            .message
            .or(parsed.detail)
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty()),
        Err(_) if !trimmed.starts_with('{') && !trimmed.starts_with('[') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}
