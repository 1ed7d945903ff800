//! Environment configuration.

use std::env;
use std::io;
use std::path::PathBuf;

use gemini_api::{GeminiConfig, DEFAULT_GEMINI_MODEL};

/// Overrides the data directory holding both key-value stores.
pub const HOME_ENV_VAR: &str = "PALAVER_HOME";
/// Overrides the generation model id.
pub const MODEL_ENV_VAR: &str = "PALAVER_MODEL";
/// Overrides the API base URL.
pub const BASE_URL_ENV_VAR: &str = "PALAVER_BASE_URL";

/// Directory name used beneath the working directory without an override.
pub const DEFAULT_DATA_DIR: &str = ".palaver";

pub fn data_dir_from_env() -> io::Result<PathBuf> {
    if let Some(home) = env_override(HOME_ENV_VAR) {
        return Ok(PathBuf::from(home));
    }
    Ok(env::current_dir()?.join(DEFAULT_DATA_DIR))
}

pub fn gemini_config_from_env() -> GeminiConfig {
    let model = env_override(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
    let mut config = GeminiConfig::new(model);
    if let Some(base_url) = env_override(BASE_URL_ENV_VAR) {
        config = config.with_base_url(base_url);
    }
    config
}

fn env_override(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
