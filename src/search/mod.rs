//! Web search backing the agent's `search` ability.

mod tavily;

pub use tavily::TavilySearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

/// Results of one search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Short answer synthesized by the provider, if it offers one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    /// Format results as readable text for the model.
    pub fn summary(&self, query: &str) -> String {
        if self.hits.is_empty() && self.answer.is_none() {
            return format!("No results found for \"{}\".", query);
        }

        let mut output = String::new();
        if let Some(answer) = &self.answer {
            output.push_str(&format!("Summary: {}\n\n", answer));
        }

        let formatted = self
            .hits
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "{}. {} ({})\n   {}",
                    i + 1,
                    hit.title,
                    hit.url,
                    hit.content.chars().take(500).collect::<String>()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        output.push_str(&format!("Found {} results:\n\n{}", self.hits.len(), formatted));
        output
    }
}

/// Trait for web search providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_hits() {
        let results = SearchResults {
            answer: Some("Robots are trending.".to_string()),
            hits: vec![SearchHit {
                title: "Robot news".to_string(),
                url: "https://news.example/robots".to_string(),
                content: "A robot did a thing.".to_string(),
                score: 0.9,
            }],
        };

        let summary = results.summary("robots");
        assert!(summary.starts_with("Summary: Robots are trending."));
        assert!(summary.contains("1. Robot news (https://news.example/robots)"));
    }

    #[test]
    fn test_summary_when_empty() {
        assert_eq!(
            SearchResults::default().summary("nothing"),
            "No results found for \"nothing\"."
        );
    }
}
