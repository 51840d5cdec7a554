//! Configuration module for Reelsmith.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PlanPrompts, Prompts};
pub use settings::{
    AgentSettings, ChatSettings, GeneralSettings, PromptSettings, RenderSettings,
    SearchSettings, ServerSettings, Settings,
};
