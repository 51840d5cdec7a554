//! Video rendering through an external render service.
//!
//! A render is submitted once and then polled by id until the service
//! reports it completed or failed. See [`wait_for_render`] for the loop.

mod client;
mod poll;

pub use client::HttpRenderApi;
pub use poll::{wait_for_render, PollPolicy};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Aspect ratio for every render.
pub const ASPECT_RATIO: &str = "9:16";
/// Background image used behind the narration.
pub const BACKGROUND_IMAGE: &str = "https://assets.reelsmith.dev/backgrounds/gradient-dusk.jpg";
/// Narrator voice.
pub const VOICE_ID: &str = "en-US-narrator-1";

/// Body of `POST /renders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub aspect_ratio: String,
    pub captions: bool,
    pub brainrot: bool,
    pub scenes: Vec<Scene>,
    pub model_config: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub narration: String,
    pub background_image: String,
    pub voice_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub image_model: String,
    pub voice_model: String,
    pub caption_style: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            image_model: "flux-schnell".to_string(),
            voice_model: "eleven_multilingual_v2".to_string(),
            caption_style: "bold-center".to_string(),
        }
    }
}

impl RenderRequest {
    /// A single-scene render narrating `script` with the fixed visual and voice parameters.
    pub fn narrated(script: &str) -> Self {
        Self {
            aspect_ratio: ASPECT_RATIO.to_string(),
            captions: true,
            brainrot: false,
            scenes: vec![Scene {
                narration: script.to_string(),
                background_image: BACKGROUND_IMAGE.to_string(),
                voice_id: VOICE_ID.to_string(),
            }],
            model_config: ModelConfig::default(),
        }
    }
}

/// Job handle returned on submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    #[serde(alias = "renderId", alias = "render_id")]
    pub id: String,
}

/// Body of `GET /api/renders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStatus {
    pub status: RenderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RenderStatus {
    pub fn pending() -> Self {
        Self {
            status: RenderState::Pending,
            url: None,
            error_message: None,
        }
    }

    pub fn completed(url: &str) -> Self {
        Self {
            status: RenderState::Completed,
            url: Some(url.to_string()),
            error_message: None,
        }
    }

    pub fn failed(reason: &str) -> Self {
        Self {
            status: RenderState::Failed,
            url: None,
            error_message: Some(reason.to_string()),
        }
    }
}

/// Render job state. Values the service adds later land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RenderState {
    Pending,
    Completed,
    Failed,
    Other(String),
}

impl From<String> for RenderState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => RenderState::Pending,
            "completed" => RenderState::Completed,
            "failed" => RenderState::Failed,
            _ => RenderState::Other(value),
        }
    }
}

impl From<RenderState> for String {
    fn from(state: RenderState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for RenderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderState::Pending => write!(f, "pending"),
            RenderState::Completed => write!(f, "completed"),
            RenderState::Failed => write!(f, "failed"),
            RenderState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Trait for render service backends.
#[async_trait]
pub trait RenderApi: Send + Sync {
    /// Submit a render and return its job handle.
    async fn submit(&self, request: &RenderRequest) -> Result<RenderJob>;

    /// Fetch the current status of a render.
    async fn status(&self, render_id: &str) -> Result<RenderStatus>;
}

/// A finished render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedVideo {
    pub render_id: String,
    pub url: String,
}

/// Submit a narrated render for `script` and wait for it to finish.
#[instrument(skip(api, script, policy), fields(script_len = script.len()))]
pub async fn create_video(
    api: &dyn RenderApi,
    script: &str,
    policy: &PollPolicy,
) -> Result<RenderedVideo> {
    let job = api.submit(&RenderRequest::narrated(script)).await?;
    info!(render_id = %job.id, "Render submitted");

    let url = wait_for_render(api, &job.id, policy).await?;
    info!(render_id = %job.id, %url, "Render completed");

    Ok(RenderedVideo {
        render_id: job.id,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelsmithError;
    use crate::testing::ScriptedRenderApi;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_request_body_matches_fixed_schema() {
        let body = serde_json::to_value(RenderRequest::narrated("AI beat a chess grandmaster.")).unwrap();

        assert_eq!(
            body,
            json!({
                "aspectRatio": "9:16",
                "captions": true,
                "brainrot": false,
                "scenes": [{
                    "narration": "AI beat a chess grandmaster.",
                    "backgroundImage": BACKGROUND_IMAGE,
                    "voiceId": VOICE_ID
                }],
                "modelConfig": {
                    "imageModel": "flux-schnell",
                    "voiceModel": "eleven_multilingual_v2",
                    "captionStyle": "bold-center"
                }
            })
        );
    }

    #[test]
    fn test_status_parsing() {
        let status: RenderStatus = serde_json::from_str(
            r#"{"status":"failed","errorMessage":"voice not found"}"#,
        )
        .unwrap();
        assert_eq!(status, RenderStatus::failed("voice not found"));

        let status: RenderStatus = serde_json::from_str(r#"{"status":"rendering"}"#).unwrap();
        assert_eq!(status.status, RenderState::Other("rendering".to_string()));
    }

    #[test]
    fn test_job_accepts_render_id_alias() {
        let job: RenderJob = serde_json::from_str(r#"{"renderId":"r-7"}"#).unwrap();
        assert_eq!(job.id, "r-7");
    }

    #[tokio::test]
    async fn test_create_video_submits_script_and_returns_url() {
        let api = ScriptedRenderApi::new(vec![
            RenderStatus::pending(),
            RenderStatus::completed("https://cdn.example/r-1.mp4"),
        ]);
        let policy = PollPolicy::unbounded(Duration::from_millis(1));

        let video = create_video(&api, "Hello world", &policy).await.unwrap();

        assert_eq!(video.render_id, "r-1");
        assert_eq!(video.url, "https://cdn.example/r-1.mp4");
        assert_eq!(api.submitted(), vec![RenderRequest::narrated("Hello world")]);
    }

    #[tokio::test]
    async fn test_create_video_propagates_failure() {
        let api = ScriptedRenderApi::new(vec![RenderStatus::failed("script too long")]);
        let policy = PollPolicy::unbounded(Duration::from_millis(1));

        let err = create_video(&api, "x", &policy).await.unwrap_err();
        assert!(matches!(err, ReelsmithError::RenderFailed(ref reason) if reason == "script too long"));
    }
}
