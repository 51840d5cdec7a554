//! Scripted stand-ins for the external services, used by unit tests.

use crate::chat::{AbilitySpec, ChatModel, Message};
use crate::error::Result;
use crate::render::{RenderApi, RenderJob, RenderRequest, RenderStatus};
use crate::search::{SearchHit, SearchProvider, SearchResults};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Chat model that replays canned replies; the last one repeats forever.
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<Message>>,
    last: Mutex<Option<Message>>,
    calls: Mutex<Vec<(Vec<Message>, usize)>>,
}

impl ScriptedChatModel {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Histories the model was invoked with, paired with the number of bound abilities.
    pub fn calls(&self) -> Vec<(Vec<Message>, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn invoke(&self, messages: &[Message], abilities: &[AbilitySpec]) -> Result<Message> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), abilities.len()));

        let mut last = self.last.lock().unwrap();
        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => last.clone().unwrap_or_else(|| Message::assistant("")),
        };
        *last = Some(reply.clone());
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Render service that replays a status sequence; the last status repeats forever.
pub struct ScriptedRenderApi {
    statuses: Mutex<VecDeque<RenderStatus>>,
    last: Mutex<RenderStatus>,
    submitted: Mutex<Vec<RenderRequest>>,
    polls: AtomicU32,
}

impl ScriptedRenderApi {
    pub fn new(statuses: Vec<RenderStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            last: Mutex::new(RenderStatus::pending()),
            submitted: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
        }
    }

    pub fn submitted(&self) -> Vec<RenderRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RenderApi for ScriptedRenderApi {
    async fn submit(&self, request: &RenderRequest) -> Result<RenderJob> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(RenderJob {
            id: format!("r-{}", submitted.len()),
        })
    }

    async fn status(&self, _render_id: &str) -> Result<RenderStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.statuses.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }
}

/// Search provider returning one fixed hit per query.
#[derive(Default)]
pub struct StaticSearch {
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str) -> Result<SearchResults> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(SearchResults {
            answer: None,
            hits: vec![SearchHit {
                title: format!("Top story about {}", query),
                url: "https://news.example/top".to_string(),
                content: "Something remarkable happened.".to_string(),
                score: 0.8,
            }],
        })
    }
}
