use std::time::Duration;

use crate::url::DEFAULT_GEMINI_BASE_URL;

/// Default model id for generation requests.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Transport configuration for Generative Language API requests.
///
/// The credential is not part of the configuration; it is supplied per call
/// so one client can serve key validation and regular generation alike.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model id interpolated into the request path.
    pub model: String,
    /// Base URL for API endpoints.
    pub base_url: String,
    /// Optional request timeout. None means the transport decides.
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl GeminiConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
