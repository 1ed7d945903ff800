use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure taxonomy for generation calls.
///
/// A successful response with no extractable text is not represented here;
/// the adapter returns the empty string and leaves placeholder substitution
/// to the caller.
#[derive(Debug, Error)]
pub enum GeminiApiError {
    /// No credential configured. Raised before any network attempt.
    #[error("API key is required")]
    MissingApiKey,

    /// Transport failure with no usable response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status from the generation service.
    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Success status with a body that does not parse as a response document.
    #[error("malformed response body: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
}

/// Upstream error bodies carry `{"error":{"message":...}}` when structured.
/// Anything else collapses to a generic status line.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("request failed (status {})", status.as_u16());

    let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) else {
        return fallback();
    };
    payload
        .error
        .and_then(|fields| fields.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(fallback)
}
