//! OpenAI chat-completion implementation.

use super::{AbilitySpec, ChatModel, Message, ToolCallRequest};
use crate::config::ChatSettings;
use crate::error::{ReelsmithError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-backed chat model.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    /// Create a chat model from settings.
    pub fn from_settings(settings: &ChatSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, messages, abilities), fields(model = %self.model, messages = messages.len()))]
    async fn invoke(&self, messages: &[Message], abilities: &[AbilitySpec]) -> Result<Message> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(to_request_messages(messages)?)
            .temperature(self.temperature);
        if !abilities.is_empty() {
            builder.tools(to_tools(abilities));
        }
        let request = builder
            .build()
            .map_err(|e| ReelsmithError::Chat(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ReelsmithError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ReelsmithError::Chat("No response from model".to_string()))?;

        let message = from_response_parts(choice.message.content, choice.message.tool_calls);
        debug!(
            tool_calls = message.requested_calls().len(),
            "Model responded"
        );
        Ok(message)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Convert the crate's history into OpenAI request messages.
fn to_request_messages(messages: &[Message]) -> Result<Vec<ChatCompletionRequestMessage>> {
    messages.iter().map(to_request_message).collect()
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let converted: ChatCompletionRequestMessage = match message {
        Message::User { content } => ChatCompletionRequestUserMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| ReelsmithError::Chat(e.to_string()))?
            .into(),
        Message::Assistant {
            content,
            tool_calls,
        } => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = content {
                args.content(text.clone());
            }
            if !tool_calls.is_empty() {
                args.tool_calls(
                    tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build()
                .map_err(|e| ReelsmithError::Chat(e.to_string()))?
                .into()
        }
        Message::Tool {
            tool_call_id,
            content,
            ..
        } => ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(tool_call_id.clone())
            .content(content.clone())
            .build()
            .map_err(|e| ReelsmithError::Chat(e.to_string()))?
            .into(),
    };
    Ok(converted)
}

/// Convert ability declarations into OpenAI function tools.
fn to_tools(abilities: &[AbilitySpec]) -> Vec<ChatCompletionTool> {
    abilities
        .iter()
        .map(|ability| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: ability.name.clone(),
                description: Some(ability.description.clone()),
                parameters: Some(ability.parameters.clone()),
                strict: None,
            },
        })
        .collect()
}

/// Build an assistant message from the parts of an OpenAI response.
fn from_response_parts(
    content: Option<String>,
    tool_calls: Option<Vec<ChatCompletionMessageToolCall>>,
) -> Message {
    let tool_calls = tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCallRequest {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        })
        .collect();

    Message::Assistant {
        content: content.filter(|c| !c.is_empty()),
        tool_calls,
    }
}
