use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gemini_api::{ChatTurn, GeminiApiError, GeminiClient, GenerationReply, GenerationSettings};

/// Seam between the orchestrator and the generation transport. Implemented by
/// [`GeminiClient`] in the binary and by [`MockBackend`] in tests.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        turns: &[ChatTurn],
        settings: &GenerationSettings,
    ) -> Result<GenerationReply, GeminiApiError>;

    async fn test_key(&self, api_key: &str) -> Result<GenerationReply, GeminiApiError>;
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        turns: &[ChatTurn],
        settings: &GenerationSettings,
    ) -> Result<GenerationReply, GeminiApiError> {
        GeminiClient::generate(self, turns, settings).await
    }

    async fn test_key(&self, api_key: &str) -> Result<GenerationReply, GeminiApiError> {
        GeminiClient::test_key(self, api_key).await
    }
}

/// One recorded backend invocation, kept for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub turns: Vec<ChatTurn>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Shared view onto a [`MockBackend`]'s recorded calls. Stays usable after
/// the backend itself moves into an `App`.
pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

/// Deterministic backend: replays canned replies in order and records every
/// call it receives. The last reply repeats once the script runs out.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<String>,
    calls: CallLog,
}

impl MockBackend {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_log(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        recorded_calls(&self.calls)
    }

    fn record(&self, turns: &[ChatTurn], settings: &GenerationSettings) -> usize {
        let mut guard = match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(RecordedCall {
            turns: turns.to_vec(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        });
        guard.len() - 1
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(vec![
            "Mocked reply with **bold**, `code`, and a list:\n- first\n- second".to_string(),
        ])
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(
        &self,
        turns: &[ChatTurn],
        settings: &GenerationSettings,
    ) -> Result<GenerationReply, GeminiApiError> {
        let index = self.record(turns, settings);
        let text = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_default();
        Ok(GenerationReply {
            text,
            elapsed: std::time::Duration::from_millis(1),
        })
    }

    async fn test_key(&self, api_key: &str) -> Result<GenerationReply, GeminiApiError> {
        if api_key.trim().is_empty() {
            return Err(GeminiApiError::MissingApiKey);
        }
        Ok(GenerationReply {
            text: "pong".to_string(),
            elapsed: std::time::Duration::from_millis(1),
        })
    }
}

/// Snapshot of a call log. Recovers the inner data from a poisoned lock.
pub fn recorded_calls(calls: &CallLog) -> Vec<RecordedCall> {
    match calls.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
