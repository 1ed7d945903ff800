use gemini_api::GenerationSettings;
use serde::{Deserialize, Serialize};
use session_store::{get_json, keys, set_json, KeyValueStore, StoreError};
use tracing::debug;

/// Settings-level bounds applied on every write. The transport applies its
/// own, wider token clamp independently.
pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 1.0;
pub const MIN_MAX_TOKENS: u32 = 64;
pub const MAX_MAX_TOKENS: u32 = 2048;

/// Generation parameters as persisted, without the credential. The credential
/// lives under its own key so clearing settings never discards it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

/// Persisted holder for the credential and generation parameters. Reads
/// degrade to defaults; writes clamp before persisting.
pub struct SettingsStore {
    kv: Box<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored credential, if one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.kv
            .get_string(keys::API_KEY)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), StoreError> {
        debug!("storing API key");
        self.kv.set_string(keys::API_KEY, api_key.trim())
    }

    #[must_use]
    pub fn generation(&self) -> StoredSettings {
        get_json(
            self.kv.as_ref(),
            keys::GENERATION_SETTINGS,
            StoredSettings::default(),
        )
    }

    pub fn set_temperature(&mut self, value: f64) -> Result<StoredSettings, StoreError> {
        let mut settings = self.generation();
        settings.temperature = clamp_temperature(value);
        self.persist(settings)?;
        Ok(settings)
    }

    pub fn set_max_tokens(&mut self, value: u32) -> Result<StoredSettings, StoreError> {
        let mut settings = self.generation();
        settings.max_tokens = value.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS);
        self.persist(settings)?;
        Ok(settings)
    }

    /// Assemble per-call adapter settings from the persisted state. A missing
    /// credential becomes the empty string; the adapter rejects it before any
    /// network attempt.
    #[must_use]
    pub fn resolved(&self) -> GenerationSettings {
        let stored = self.generation();
        GenerationSettings {
            api_key: self.api_key().unwrap_or_default(),
            temperature: stored.temperature,
            max_tokens: stored.max_tokens,
        }
    }

    fn persist(&mut self, settings: StoredSettings) -> Result<(), StoreError> {
        debug!(
            temperature = settings.temperature,
            max_tokens = settings.max_tokens,
            "persisting generation settings"
        );
        set_json(self.kv.as_mut(), keys::GENERATION_SETTINGS, &settings)
    }
}

fn clamp_temperature(value: f64) -> f64 {
    if !value.is_finite() {
        return default_temperature();
    }
    value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}
