//! Prompt templates for Reelsmith.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub plan: PlanPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// The fixed objective, ability descriptors and plan template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanPrompts {
    /// Objective handed to both the planner and the agent loop.
    pub objective: String,
    /// Abilities the planner may assume are available.
    pub abilities: Vec<String>,
    /// Template rendered with {{objective}}, {{abilities}} and {{format_instructions}}.
    pub template: String,
}

impl Default for PlanPrompts {
    fn default() -> Self {
        Self {
            objective: "Find out what is trending in AI news today, write a short \
                punchy narration script about the most interesting story, turn it \
                into a narrated vertical video, and tweet the video link."
                .to_string(),

            abilities: vec![
                "search: search the web for up-to-date information".to_string(),
                "post_tweet: publish a short text post on Twitter/X".to_string(),
                "create_video: render a narrated short-form video from a script".to_string(),
            ],

            template: r#"You are a planning assistant. Break the objective below into a short, ordered list of concrete steps.
Only use the abilities listed. Each step should be a single sentence.

Objective:
{{objective}}

Abilities:
{{abilities}}

{{format_instructions}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&Path>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let plan_path = dir.join("plan.toml");
            if plan_path.exists() {
                let content = std::fs::read_to_string(&plan_path)?;
                prompts.plan = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The objective with custom variables substituted.
    pub fn objective(&self) -> String {
        Self::render(&self.plan.objective, &self.variables)
    }

    /// Ability descriptors as a bulleted list.
    pub fn abilities_list(&self) -> String {
        self.plan
            .abilities
            .iter()
            .map(|a| format!("- {}", a))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
