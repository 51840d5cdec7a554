//! Ability definitions and implementations for the agent system.

use crate::chat::AbilitySpec;
use crate::error::{ReelsmithError, Result};
use crate::render::{create_video, PollPolicy, RenderApi};
use crate::search::SearchProvider;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Abilities the agent can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum AbilityCall {
    /// Search the web.
    Search { query: String },

    /// Post a tweet. Stubbed: nothing leaves the process.
    PostTweet { text: String },

    /// Render a narrated video from a script.
    CreateVideo { script: String },
}

/// Result of an ability: a summary for the model and a structured artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityOutput {
    pub summary: String,
    pub artifact: Value,
}

/// Services the abilities run against.
#[derive(Clone)]
pub struct AbilityContext {
    pub search: Arc<dyn SearchProvider>,
    pub renderer: Arc<dyn RenderApi>,
    pub poll: PollPolicy,
}

impl AbilityContext {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        renderer: Arc<dyn RenderApi>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            search,
            renderer,
            poll,
        }
    }

    /// Execute an ability call.
    pub async fn execute(&self, call: &AbilityCall) -> Result<AbilityOutput> {
        match call {
            AbilityCall::Search { query } => self.execute_search(query).await,
            AbilityCall::PostTweet { text } => Ok(post_tweet(text)),
            AbilityCall::CreateVideo { script } => self.execute_create_video(script).await,
        }
    }

    async fn execute_search(&self, query: &str) -> Result<AbilityOutput> {
        let results = self.search.search(query).await?;
        Ok(AbilityOutput {
            summary: results.summary(query),
            artifact: serde_json::to_value(&results)?,
        })
    }

    async fn execute_create_video(&self, script: &str) -> Result<AbilityOutput> {
        let video = create_video(self.renderer.as_ref(), script, &self.poll).await?;
        Ok(AbilityOutput {
            summary: format!("Video created: {}", video.url),
            artifact: serde_json::to_value(&video)?,
        })
    }
}

fn post_tweet(text: &str) -> AbilityOutput {
    info!(chars = text.chars().count(), "Posting tweet (stub)");
    AbilityOutput {
        summary: format!("Tweet posted: {}", text),
        artifact: json!({
            "text": text,
            "characters": text.chars().count(),
        }),
    }
}

/// Declarations of every ability, in the order they are offered to the model.
pub fn ability_definitions() -> Vec<AbilitySpec> {
    vec![
        AbilitySpec {
            name: "search".to_string(),
            description: "Search the web for current information. \
                Use this to find recent news or facts before writing anything."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        },
        AbilitySpec {
            name: "post_tweet".to_string(),
            description: "Post a tweet. Keep it under 280 characters.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The tweet text"
                    }
                },
                "required": ["text"]
            }),
        },
        AbilitySpec {
            name: "create_video".to_string(),
            description: "Create a narrated short-form vertical video from a script. \
                Returns the URL of the finished video."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "script": {
                        "type": "string",
                        "description": "The narration script, read aloud over the video"
                    }
                },
                "required": ["script"]
            }),
        },
    ]
}

/// Parse an ability call from the model's name and JSON arguments.
pub fn parse_ability_call(name: &str, arguments: &str) -> Result<AbilityCall> {
    let args: Value = serde_json::from_str(arguments)
        .map_err(|e| ReelsmithError::Agent(format!("Invalid ability arguments: {}", e)))?;

    let required = |key: &str| -> Result<String> {
        args.get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ReelsmithError::Agent(format!("Missing '{}' argument", key)))
    };

    match name {
        "search" => Ok(AbilityCall::Search {
            query: required("query")?,
        }),
        "post_tweet" => Ok(AbilityCall::PostTweet {
            text: required("text")?,
        }),
        "create_video" => Ok(AbilityCall::CreateVideo {
            script: required("script")?,
        }),
        _ => Err(ReelsmithError::Agent(format!("Unknown ability: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderStatus;
    use crate::testing::{ScriptedRenderApi, StaticSearch};
    use std::time::Duration;

    fn context(renderer: Arc<ScriptedRenderApi>) -> AbilityContext {
        AbilityContext::new(
            Arc::new(StaticSearch::default()),
            renderer,
            PollPolicy::unbounded(Duration::from_millis(1)),
        )
    }

    #[test]
    fn test_parse_search() {
        let call = parse_ability_call("search", r#"{"query": "ai news"}"#).unwrap();
        assert_eq!(
            call,
            AbilityCall::Search {
                query: "ai news".to_string()
            }
        );
    }

    #[test]
    fn test_parse_create_video() {
        let call = parse_ability_call("create_video", r#"{"script": "Hello"}"#).unwrap();
        assert_eq!(
            call,
            AbilityCall::CreateVideo {
                script: "Hello".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_and_unknown() {
        let err = parse_ability_call("post_tweet", "{}").unwrap_err();
        assert!(err.to_string().contains("Missing 'text' argument"));

        let err = parse_ability_call("delete_account", "{}").unwrap_err();
        assert!(err.to_string().contains("Unknown ability"));

        assert!(parse_ability_call("search", "not json").is_err());
    }

    #[test]
    fn test_definitions_declare_required_inputs() {
        let defs = ability_definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["search", "post_tweet", "create_video"]);
        assert_eq!(defs[2].parameters["required"], json!(["script"]));
    }

    #[tokio::test]
    async fn test_post_tweet_is_a_stub() {
        let ctx = context(Arc::new(ScriptedRenderApi::new(vec![])));
        let out = ctx
            .execute(&AbilityCall::PostTweet {
                text: "hello".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(out.summary, "Tweet posted: hello");
        assert_eq!(out.artifact, json!({ "text": "hello", "characters": 5 }));
    }

    #[tokio::test]
    async fn test_create_video_returns_summary_and_artifact() {
        let renderer = Arc::new(ScriptedRenderApi::new(vec![
            RenderStatus::pending(),
            RenderStatus::completed("https://cdn.example/v.mp4"),
        ]));
        let ctx = context(renderer.clone());

        let out = ctx
            .execute(&AbilityCall::CreateVideo {
                script: "Narrate this".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(out.summary, "Video created: https://cdn.example/v.mp4");
        assert_eq!(
            out.artifact,
            json!({ "render_id": "r-1", "url": "https://cdn.example/v.mp4" })
        );
        assert_eq!(renderer.submitted()[0].scenes[0].narration, "Narrate this");
    }

    #[tokio::test]
    async fn test_search_artifact_holds_hits() {
        let ctx = context(Arc::new(ScriptedRenderApi::new(vec![])));
        let out = ctx
            .execute(&AbilityCall::Search {
                query: "rust".to_string(),
            })
            .await
            .unwrap();

        assert!(out.summary.contains("Top story about rust"));
        assert_eq!(out.artifact["hits"][0]["url"], "https://news.example/top");
    }
}
