//! OpenAI client configuration with sensible defaults.

use crate::config::ChatSettings;
use crate::error::{ReelsmithError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client from chat settings.
///
/// Falls back to the `OPENAI_API_KEY` environment variable when the settings
/// carry no key, which is what `OpenAIConfig::default()` does.
pub fn create_client(settings: &ChatSettings) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::default();
    if let Some(key) = settings.api_key.as_deref().filter(|k| !k.is_empty()) {
        config = config.with_api_key(key);
    }
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    create_client_with_timeout(config, Duration::from_secs(settings.timeout_secs))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(
    config: OpenAIConfig,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ReelsmithError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(config).with_http_client(http_client))
}
