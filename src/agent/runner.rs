//! Agent runner: the model/tools loop.
//!
//! The loop alternates between two nodes. The model node calls the chat
//! model with the whole history and appends its reply; the tools node runs
//! every ability the reply asked for and appends one tool message per call.
//! [`route_after_model`] decides which node follows the model.

use super::tools::{ability_definitions, parse_ability_call, AbilityContext};
use crate::chat::{ChatModel, Message, ToolCallRequest};
use crate::error::{ReelsmithError, Result};
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Default cap on model calls per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Where control goes after the model node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Tools,
    End,
}

/// Route to the tools node when the latest message requests ability calls.
pub fn route_after_model(history: &[Message]) -> Route {
    match history.last() {
        Some(message) if !message.requested_calls().is_empty() => Route::Tools,
        _ => Route::End,
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Model,
    Tools,
}

/// A model bound to an ability set, run as a model/tools loop.
pub struct AgentGraph {
    model: Arc<dyn ChatModel>,
    abilities: AbilityContext,
    max_iterations: usize,
}

impl AgentGraph {
    pub fn new(model: Arc<dyn ChatModel>, abilities: AbilityContext) -> Self {
        Self {
            model,
            abilities,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set maximum model calls for the loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the loop from a single user message until the model stops asking for abilities.
    #[instrument(skip(self, objective), fields(model = %self.model.model_name()))]
    pub async fn run(&self, objective: &str) -> Result<AgentRun> {
        let abilities = ability_definitions();
        let mut history = vec![Message::user(objective)];
        let mut iterations = 0;
        let mut node = Node::Model;

        loop {
            node = match node {
                Node::Model => {
                    iterations += 1;
                    if iterations > self.max_iterations {
                        return Err(ReelsmithError::Agent(format!(
                            "Agent exceeded maximum iterations ({})",
                            self.max_iterations
                        )));
                    }
                    debug!("Agent iteration {}", iterations);

                    let reply = self.model.invoke(&history, &abilities).await?;
                    history.push(reply);

                    match route_after_model(&history) {
                        Route::Tools => Node::Tools,
                        Route::End => break,
                    }
                }
                Node::Tools => {
                    let calls = history
                        .last()
                        .map(|m| m.requested_calls().to_vec())
                        .unwrap_or_default();

                    let results = try_join_all(calls.iter().map(|call| self.call_ability(call))).await?;
                    history.extend(results);
                    Node::Model
                }
            };
        }

        info!(iterations, messages = history.len(), "Agent finished");
        Ok(AgentRun {
            messages: history,
            iterations,
        })
    }

    /// Run one requested ability and wrap its result as a tool message.
    ///
    /// Malformed requests are reported back to the model; failures of the
    /// ability itself abort the run.
    async fn call_ability(&self, call: &ToolCallRequest) -> Result<Message> {
        info!("Agent calling ability: {} with args: {}", call.name, call.arguments);

        let (content, artifact) = match parse_ability_call(&call.name, &call.arguments) {
            Ok(ability) => {
                let output = self.abilities.execute(&ability).await?;
                (output.summary, output.artifact)
            }
            Err(e) => {
                warn!(ability = %call.name, error = %e, "Rejected ability call");
                (format!("Failed to parse ability call: {}", e), Value::Null)
            }
        };

        Ok(Message::Tool {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            content,
            artifact,
        })
    }
}

/// Outcome of an agent run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    /// The full accumulated history, starting with the objective.
    pub messages: Vec<Message>,
    /// Number of model calls made.
    #[serde(skip)]
    pub iterations: usize,
}

impl AgentRun {
    /// Text of the final assistant message.
    pub fn final_answer(&self) -> Option<&str> {
        self.messages.last().and_then(Message::text)
    }

    /// Every ability call requested during the run.
    pub fn ability_calls(&self) -> Vec<&ToolCallRequest> {
        self.messages
            .iter()
            .flat_map(|m| m.requested_calls())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PollPolicy, RenderStatus};
    use crate::testing::{ScriptedChatModel, ScriptedRenderApi, StaticSearch};
    use serde_json::json;
    use std::time::Duration;

    fn abilities(renderer: ScriptedRenderApi) -> (AbilityContext, Arc<StaticSearch>) {
        let search = Arc::new(StaticSearch::default());
        let ctx = AbilityContext::new(
            search.clone(),
            Arc::new(renderer),
            PollPolicy::unbounded(Duration::from_millis(1)),
        );
        (ctx, search)
    }

    #[test]
    fn test_route_to_tools_when_calls_requested() {
        let history = vec![
            Message::user("go"),
            Message::assistant_with_calls(vec![
                ToolCallRequest::new("a", "search", "{}"),
                ToolCallRequest::new("b", "post_tweet", "{}"),
            ]),
        ];
        assert_eq!(route_after_model(&history), Route::Tools);
    }

    #[test]
    fn test_route_ends_without_calls() {
        assert_eq!(route_after_model(&[Message::user("go"), Message::assistant("done")]), Route::End);
        assert_eq!(route_after_model(&[Message::assistant_with_calls(vec![])]), Route::End);
        assert_eq!(route_after_model(&[]), Route::End);
        assert_eq!(route_after_model(&[Message::user("go")]), Route::End);
    }

    #[tokio::test]
    async fn test_loop_runs_tools_then_finishes() {
        let model = Arc::new(ScriptedChatModel::new(vec![
            Message::assistant_with_calls(vec![ToolCallRequest::new(
                "call_1",
                "search",
                r#"{"query":"ai news"}"#,
            )]),
            Message::assistant_with_calls(vec![
                ToolCallRequest::new("call_2", "create_video", r#"{"script":"Big news"}"#),
                ToolCallRequest::new("call_3", "post_tweet", r#"{"text":"Watch this"}"#),
            ]),
            Message::assistant("Posted the video."),
        ]));
        let (ctx, search) = abilities(ScriptedRenderApi::new(vec![
            RenderStatus::pending(),
            RenderStatus::completed("https://cdn.example/big.mp4"),
        ]));

        let run = AgentGraph::new(model.clone(), ctx)
            .run("Make a video")
            .await
            .unwrap();

        assert_eq!(run.iterations, 3);
        assert_eq!(run.messages.len(), 7);
        assert_eq!(run.messages[0], Message::user("Make a video"));
        assert_eq!(run.final_answer(), Some("Posted the video."));
        assert_eq!(run.ability_calls().len(), 3);
        assert_eq!(search.queries(), vec!["ai news".to_string()]);

        // Tool results keep request order and carry artifacts.
        match (&run.messages[4], &run.messages[5]) {
            (
                Message::Tool { tool_call_id: first, artifact, .. },
                Message::Tool { tool_call_id: second, content, .. },
            ) => {
                assert_eq!(first, "call_2");
                assert_eq!(artifact["url"], json!("https://cdn.example/big.mp4"));
                assert_eq!(second, "call_3");
                assert_eq!(content, "Tweet posted: Watch this");
            }
            other => panic!("Expected tool messages, got {:?}", other),
        }

        // Every model call sees the full history and the whole ability set.
        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0.len(), 1);
        assert_eq!(calls[2].0.len(), 6);
        assert!(calls.iter().all(|(_, n)| *n == 3));
    }

    #[tokio::test]
    async fn test_direct_answer_ends_immediately() {
        let model = Arc::new(ScriptedChatModel::new(vec![Message::assistant("Nothing to do.")]));
        let (ctx, _) = abilities(ScriptedRenderApi::new(vec![]));

        let run = AgentGraph::new(model, ctx).run("Say hi").await.unwrap();

        assert_eq!(run.iterations, 1);
        assert_eq!(run.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_call_is_reported_to_model() {
        let model = Arc::new(ScriptedChatModel::new(vec![
            Message::assistant_with_calls(vec![ToolCallRequest::new("x", "launch_rocket", "{}")]),
            Message::assistant("Sorry, I can't do that."),
        ]));
        let (ctx, _) = abilities(ScriptedRenderApi::new(vec![]));

        let run = AgentGraph::new(model, ctx).run("Launch").await.unwrap();

        match &run.messages[2] {
            Message::Tool { content, artifact, .. } => {
                assert!(content.contains("Unknown ability: launch_rocket"));
                assert_eq!(artifact, &Value::Null);
            }
            other => panic!("Expected tool message, got {:?}", other),
        }
        assert_eq!(run.final_answer(), Some("Sorry, I can't do that."));
    }

    #[tokio::test]
    async fn test_render_failure_aborts_run() {
        let model = Arc::new(ScriptedChatModel::new(vec![Message::assistant_with_calls(vec![
            ToolCallRequest::new("v", "create_video", r#"{"script":"x"}"#),
        ])]));
        let (ctx, _) = abilities(ScriptedRenderApi::new(vec![RenderStatus::failed(
            "voice unavailable",
        )]));

        let err = AgentGraph::new(model, ctx).run("Video").await.unwrap_err();

        assert!(matches!(err, ReelsmithError::RenderFailed(ref r) if r == "voice unavailable"));
    }

    #[tokio::test]
    async fn test_iteration_cap_stops_endless_tool_requests() {
        let model = Arc::new(ScriptedChatModel::new(vec![Message::assistant_with_calls(vec![
            ToolCallRequest::new("t", "post_tweet", r#"{"text":"again"}"#),
        ])]));
        let (ctx, _) = abilities(ScriptedRenderApi::new(vec![]));

        let err = AgentGraph::new(model.clone(), ctx)
            .with_max_iterations(3)
            .run("Loop")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("maximum iterations (3)"));
        assert_eq!(model.calls().len(), 3);
    }

    #[test]
    fn test_run_serializes_messages_only() {
        let run = AgentRun {
            messages: vec![Message::user("hi")],
            iterations: 1,
        };
        assert_eq!(
            serde_json::to_value(&run).unwrap(),
            json!({ "messages": [{ "role": "user", "content": "hi" }] })
        );
    }
}
