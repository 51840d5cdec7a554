//! Configuration settings for Reelsmith.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub chat: ChatSettings,
    pub render: RenderSettings,
    pub search: SearchSettings,
    pub agent: AgentSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Chat model used for planning and the agent loop.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// API key. Falls back to OPENAI_API_KEY when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (for OpenAI-compatible providers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            api_key: None,
            api_base: None,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Lower bound for `render.poll_interval_ms`.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Video render service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Base URL of the render service.
    pub base_url: String,
    /// API key sent in the `x-api-key` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Milliseconds between status checks. At least `MIN_POLL_INTERVAL_MS`.
    pub poll_interval_ms: u64,
    /// Maximum number of status checks. 0 polls until the job resolves.
    pub max_poll_attempts: u32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            poll_interval_ms: 1000,
            max_poll_attempts: 600, // 10 minutes at the default interval
            timeout_secs: 30,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the Tavily-compatible search API.
    pub base_url: String,
    /// Search API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Maximum number of hits returned to the agent.
    pub max_results: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            api_key: None,
            max_results: 5,
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum number of model calls in a single agent run. Must be at least 1.
    pub max_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self { max_iterations: 15 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would stall or spin the agent and render loops.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(crate::error::ReelsmithError::Config(
                "agent.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.render.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(crate::error::ReelsmithError::Config(format!(
                "render.poll_interval_ms must be at least {} (got {})",
                MIN_POLL_INTERVAL_MS, self.render.poll_interval_ms
            )));
        }
        Ok(())
    }

    /// Overlay credentials and endpoints from the environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.chat.api_key = Some(v);
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.chat.api_base = Some(v);
        }
        if let Some(v) = lookup("RENDER_API_URL") {
            self.render.base_url = v;
        }
        if let Some(v) = lookup("RENDER_API_KEY") {
            self.render.api_key = Some(v);
        }
        if let Some(v) = lookup("TAVILY_API_KEY") {
            self.search.api_key = Some(v);
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ReelsmithError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelsmith")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded custom prompt directory, if configured.
    pub fn prompts_dir(&self) -> Option<PathBuf> {
        self.prompts.custom_dir.as_deref().map(Self::expand_path)
    }
}
