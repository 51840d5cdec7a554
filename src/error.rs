//! Error types for Reelsmith.

use thiserror::Error;

/// Library-level error type for Reelsmith operations.
#[derive(Error, Debug)]
pub enum ReelsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat model error: {0}")]
    Chat(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Plan parsing failed: {0}")]
    Plan(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Render service returned {status}: {message}")]
    RenderApi { status: u16, message: String },

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Render {render_id} still unfinished after {attempts} status checks")]
    RenderTimedOut { render_id: String, attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ReelsmithError {
    /// Whether the error originated in a third-party service rather than locally.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ReelsmithError::OpenAI(_)
                | ReelsmithError::Search(_)
                | ReelsmithError::RenderApi { .. }
                | ReelsmithError::RenderFailed(_)
                | ReelsmithError::Http(_)
        )
    }
}

/// Result type alias for Reelsmith operations.
pub type Result<T> = std::result::Result<T, ReelsmithError>;
