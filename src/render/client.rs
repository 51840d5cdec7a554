//! HTTP client for the render service.

use super::{RenderApi, RenderJob, RenderRequest, RenderStatus};
use crate::config::RenderSettings;
use crate::error::{ReelsmithError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Header carrying the render service API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Render service reached over HTTP.
pub struct HttpRenderApi {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpRenderApi {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReelsmithError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_settings(settings: &RenderSettings) -> Result<Self> {
        Self::new(
            &settings.base_url,
            settings.api_key.as_deref().unwrap_or_default(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Status URL for a render; the id is percent-encoded as one path segment.
    fn status_url(&self, render_id: &str) -> Result<Url> {
        let mut url = self.endpoint("api/renders/")?;
        url.path_segments_mut()
            .map_err(|_| ReelsmithError::Config(format!("Invalid render URL: {}", self.base_url)))?
            .pop_if_empty()
            .push(render_id);
        Ok(url)
    }

    /// Turn a non-success response into an error carrying status and message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ReelsmithError::RenderApi {
            status: status.as_u16(),
            message: error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
        })
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["message", "error", "errorMessage"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl RenderApi for HttpRenderApi {
    #[instrument(skip(self, request), fields(scenes = request.scenes.len()))]
    async fn submit(&self, request: &RenderRequest) -> Result<RenderJob> {
        let response = self
            .client
            .post(self.endpoint("renders")?)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let job: RenderJob = Self::check(response).await?.json().await?;
        debug!(render_id = %job.id, "Render accepted");
        Ok(job)
    }

    #[instrument(skip(self))]
    async fn status(&self, render_id: &str) -> Result<RenderStatus> {
        let response = self
            .client
            .get(self.status_url(render_id)?)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }
}
