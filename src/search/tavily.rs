//! Tavily search API client.

use super::{SearchHit, SearchProvider, SearchResults};
use crate::config::SearchSettings;
use crate::error::{ReelsmithError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// Search through the Tavily API.
pub struct TavilySearch {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    max_results: u32,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'static str,
    include_answer: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
    #[serde(default)]
    answer: Option<String>,
}

impl TavilySearch {
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        let base = if settings.base_url.ends_with('/') {
            Url::parse(&settings.base_url)?
        } else {
            Url::parse(&format!("{}/", settings.base_url))?
        };
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: base.join("search")?,
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            max_results: settings.max_results,
        })
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<SearchResults> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ReelsmithError::Config(
                "TAVILY_API_KEY not set. Set it with: export TAVILY_API_KEY='tvly-...'".to_string(),
            )
        })?;

        let request = TavilyRequest {
            api_key,
            query,
            max_results: self.max_results,
            search_depth: "basic",
            include_answer: true,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReelsmithError::Search(format!(
                "Tavily API error: {} - {}",
                status, body
            )));
        }

        let parsed: TavilyResponse = response.json().await.map_err(|e| {
            ReelsmithError::Search(format!("Failed to parse Tavily response: {}", e))
        })?;

        debug!(hits = parsed.results.len(), "Search completed");
        Ok(SearchResults {
            answer: parsed.answer.filter(|a| !a.is_empty()),
            hits: parsed.results,
        })
    }
}
