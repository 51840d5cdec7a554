//! Wiring of the external services into plan and agent runs.
//!
//! The orchestrator only holds stateless clients. Every call builds its own
//! ability set and agent loop, so concurrent requests share nothing mutable.

use crate::agent::{AbilityContext, AgentGraph, AgentRun};
use crate::chat::{ChatModel, OpenAIChatModel};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::plan::{Plan, PlanGenerator};
use crate::render::{HttpRenderApi, PollPolicy, RenderApi};
use crate::search::{SearchProvider, TavilySearch};
use std::sync::Arc;

/// Shared clients plus the settings that shape each run.
#[derive(Clone)]
pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    renderer: Arc<dyn RenderApi>,
    search: Arc<dyn SearchProvider>,
    prompts: Prompts,
    poll: PollPolicy,
    max_iterations: usize,
}

impl Orchestrator {
    /// Build the production clients from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts_dir().as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self::with_services(
            Arc::new(OpenAIChatModel::from_settings(&settings.chat)?),
            Arc::new(HttpRenderApi::from_settings(&settings.render)?),
            Arc::new(TavilySearch::from_settings(&settings.search)?),
            prompts,
        )
        .with_poll_policy(PollPolicy::from_settings(&settings.render))
        .with_max_iterations(settings.agent.max_iterations))
    }

    /// Assemble an orchestrator from explicit service implementations.
    pub fn with_services(
        model: Arc<dyn ChatModel>,
        renderer: Arc<dyn RenderApi>,
        search: Arc<dyn SearchProvider>,
        prompts: Prompts,
    ) -> Self {
        Self {
            model,
            renderer,
            search,
            prompts,
            poll: PollPolicy::default(),
            max_iterations: crate::agent::DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// The objective both routes work toward.
    pub fn objective(&self) -> String {
        self.prompts.objective()
    }

    /// Generate a plan for the objective.
    pub async fn generate_plan(&self) -> Result<Plan> {
        PlanGenerator::new(self.model.clone(), self.prompts.clone())
            .generate()
            .await
    }

    /// Run the agent loop for the objective with a freshly built ability set.
    pub async fn run_agent(&self) -> Result<AgentRun> {
        let abilities = AbilityContext::new(self.search.clone(), self.renderer.clone(), self.poll);

        AgentGraph::new(self.model.clone(), abilities)
            .with_max_iterations(self.max_iterations)
            .run(&self.objective())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Message, ToolCallRequest};
    use crate::render::RenderStatus;
    use crate::testing::{ScriptedChatModel, ScriptedRenderApi, StaticSearch};

    #[test]
    fn test_new_builds_from_default_settings() {
        let orchestrator = Orchestrator::new(&Settings::default()).unwrap();
        assert_eq!(orchestrator.max_iterations, 15);
        assert_eq!(orchestrator.poll.max_attempts, Some(600));
    }

    #[tokio::test]
    async fn test_run_agent_starts_from_objective() {
        let model = Arc::new(ScriptedChatModel::new(vec![
            Message::assistant_with_calls(vec![ToolCallRequest::new(
                "c1",
                "create_video",
                r#"{"script":"Today in AI"}"#,
            )]),
            Message::assistant("Video is live."),
        ]));
        let orchestrator = Orchestrator::with_services(
            model,
            Arc::new(ScriptedRenderApi::new(vec![RenderStatus::completed(
                "https://cdn.example/today.mp4",
            )])),
            Arc::new(StaticSearch::default()),
            Prompts::default(),
        )
        .with_poll_policy(PollPolicy::unbounded(std::time::Duration::from_millis(1)));

        let run = orchestrator.run_agent().await.unwrap();

        assert_eq!(run.messages[0], Message::user(orchestrator.objective()));
        assert_eq!(run.final_answer(), Some("Video is live."));
    }
}
