//! Role-tagged conversation messages threaded through the agent loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Input from the user.
    User { content: String },

    /// A model turn, optionally requesting ability calls.
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },

    /// The result of one ability call.
    Tool {
        tool_call_id: String,
        name: String,
        /// Human-readable summary shown to the model.
        content: String,
        /// Structured result kept alongside the summary.
        #[serde(default)]
        artifact: Value,
    },
}

/// An ability call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments as produced by the model.
    pub arguments: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant_with_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Message::Assistant {
            content: None,
            tool_calls,
        }
    }

    /// Ability calls requested by this message; empty unless it is an assistant turn.
    pub fn requested_calls(&self) -> &[ToolCallRequest] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Text content of the message, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::User { content } | Message::Tool { content, .. } => Some(content.as_str()),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

impl std::fmt::Display for ToolCallRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
