//! Pre-flight checks before network operations.
//!
//! Validates that required credentials are configured before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{ReelsmithError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Planning needs only the chat model.
    Plan,
    /// The agent loop needs the chat model and the render service.
    Agent,
    /// Serving answers both routes.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Plan => {
            check_chat_key(settings)?;
        }
        Operation::Agent | Operation::Serve => {
            check_chat_key(settings)?;
            check_render(settings)?;
        }
    }
    Ok(())
}

/// Check if a chat API key is configured.
fn check_chat_key(settings: &Settings) -> Result<()> {
    match settings.chat.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ReelsmithError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check the render service endpoint and key.
fn check_render(settings: &Settings) -> Result<()> {
    url::Url::parse(&settings.render.base_url).map_err(|e| {
        ReelsmithError::Config(format!(
            "Invalid render base URL '{}': {}",
            settings.render.base_url, e
        ))
    })?;

    match settings.render.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ReelsmithError::Config(
            "RENDER_API_KEY not set. Set it with: export RENDER_API_KEY='...'".to_string(),
        )),
    }
}
