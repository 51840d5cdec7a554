//! Plan generation: ask the model for an ordered list of steps.
//!
//! The prompt carries format instructions derived from the plan schema and
//! the reply is parsed back against that schema.

use crate::chat::{ChatModel, Message};
use crate::config::Prompts;
use crate::error::{ReelsmithError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// An ordered sequence of steps toward the objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<String>,
}

/// JSON schema the model's reply must satisfy.
pub fn plan_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "steps": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Different steps to follow, in the order they should happen"
            }
        },
        "required": ["steps"]
    })
}

/// Instructions appended to the prompt telling the model how to format its reply.
pub fn format_instructions() -> String {
    let schema = serde_json::to_string_pretty(&plan_schema()).unwrap_or_default();
    format!(
        "You must format your output as a JSON value that adheres to the following JSON schema.\n\
         Respond with the JSON object only, without any surrounding text.\n\n```json\n{}\n```",
        schema
    )
}

/// Parse the model's reply into a plan.
pub fn parse_plan(response: &str) -> Result<Plan> {
    let json_str = fenced_body(response).unwrap_or_else(|| outer_object(response));

    serde_json::from_str(json_str.trim()).map_err(|e| {
        ReelsmithError::Plan(format!(
            "{}. Response was: {}",
            e,
            response.chars().take(500).collect::<String>()
        ))
    })
}

/// Body of the first fenced code block, with an optional language tag dropped.
fn fenced_body(response: &str) -> Option<&str> {
    let open = response.find("```")?;
    let after = &response[open + 3..];
    let body = &after[after.find('\n')? + 1..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Text from the first `{` to the last `}`, or the whole reply.
fn outer_object(response: &str) -> &str {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response,
    }
}

/// Builds the planning prompt and parses the model's plan.
pub struct PlanGenerator {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
}

impl PlanGenerator {
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self { model, prompts }
    }

    /// Render the planning prompt.
    pub fn build_prompt(&self) -> String {
        let mut vars = HashMap::new();
        vars.insert("objective".to_string(), self.prompts.objective());
        vars.insert("abilities".to_string(), self.prompts.abilities_list());
        vars.insert("format_instructions".to_string(), format_instructions());

        self.prompts
            .render_with_custom(&self.prompts.plan.template, &vars)
    }

    /// Ask the model for a plan and log each step.
    #[instrument(skip(self), fields(model = %self.model.model_name()))]
    pub async fn generate(&self) -> Result<Plan> {
        let prompt = self.build_prompt();
        let reply = self.model.invoke(&[Message::user(prompt)], &[]).await?;

        let text = reply
            .text()
            .ok_or_else(|| ReelsmithError::Plan("Empty response from model".to_string()))?;
        let plan = parse_plan(text)?;

        for (i, step) in plan.steps.iter().enumerate() {
            info!(step = i + 1, "{}", step);
        }

        Ok(plan)
    }
}
