//! Chat-completion models used by the planner and the agent loop.

mod message;
mod openai;

pub use message::{Message, ToolCallRequest};
pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Declaration of an ability the model may call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilitySpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the ability's input.
    pub parameters: serde_json::Value,
}

/// Trait for chat-completion models.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation and return the model's assistant message.
    ///
    /// When `abilities` is non-empty the model is bound to them and may
    /// answer with ability-call requests instead of text.
    async fn invoke(&self, messages: &[Message], abilities: &[AbilitySpec]) -> Result<Message>;

    /// Name of the underlying model.
    fn model_name(&self) -> &str;
}
