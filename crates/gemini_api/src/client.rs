use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::{parse_error_message, GeminiApiError};
use crate::payload::{ChatTurn, GenerateContentRequest, GenerationSettings};
use crate::response::{extract_text, GenerateContentResponse};
use crate::url::generate_content_url;

/// Probe turn sent by [`GeminiClient::test_key`].
const PROBE_MESSAGE: &str = "ping";
const PROBE_TEMPERATURE: f64 = 0.0;
const PROBE_MAX_TOKENS: u32 = 16;

#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

/// Outcome of one successful generation call. `text` may be empty when the
/// service returned no extractable fragments.
#[derive(Debug, Clone)]
pub struct GenerationReply {
    pub text: String,
    pub elapsed: Duration,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GeminiApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn endpoint(&self, api_key: &str) -> String {
        generate_content_url(&self.config.base_url, &self.config.model, api_key)
    }

    /// Assemble the outgoing request without sending it. Fails with
    /// [`GeminiApiError::MissingApiKey`] on a blank credential so no request
    /// ever leaves without one.
    pub fn build_request(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::RequestBuilder, GeminiApiError> {
        if api_key.trim().is_empty() {
            return Err(GeminiApiError::MissingApiKey);
        }
        Ok(self.http.post(self.endpoint(api_key)).json(request))
    }

    /// Issue exactly one generation attempt for the windowed turns.
    pub async fn generate(
        &self,
        turns: &[ChatTurn],
        settings: &GenerationSettings,
    ) -> Result<GenerationReply, GeminiApiError> {
        let payload =
            GenerateContentRequest::new(turns, settings.temperature, settings.max_tokens);
        self.send(&settings.api_key, &payload).await
    }

    /// Validate a credential with a fixed low-cost probe. Shares the request
    /// shape of [`GeminiClient::generate`] and touches no session state.
    pub async fn test_key(&self, api_key: &str) -> Result<GenerationReply, GeminiApiError> {
        let probe = [ChatTurn::user(PROBE_MESSAGE)];
        let payload = GenerateContentRequest::new(&probe, PROBE_TEMPERATURE, PROBE_MAX_TOKENS);
        self.send(api_key, &payload).await
    }

    async fn send(
        &self,
        api_key: &str,
        payload: &GenerateContentRequest,
    ) -> Result<GenerationReply, GeminiApiError> {
        let request = self.build_request(api_key, payload)?;
        debug!(
            model = %self.config.model,
            contents = payload.contents.len(),
            "sending generateContent request"
        );

        let started = Instant::now();
        let response = request.send().await.map_err(GeminiApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiApiError::Upstream {
                status: status.as_u16(),
                message: parse_error_message(status, &body),
            });
        }

        let body = response.text().await.map_err(GeminiApiError::from)?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|error| GeminiApiError::MalformedResponse(error.to_string()))?;

        let elapsed = started.elapsed();
        debug!(elapsed_ms = elapsed.as_millis() as u64, "generation completed");
        Ok(GenerationReply {
            text: extract_text(&parsed),
            elapsed,
        })
    }
}
