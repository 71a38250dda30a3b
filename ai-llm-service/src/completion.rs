//! Provider-agnostic completion request and the trait the pipeline depends on.

use async_trait::async_trait;
use serde::Serialize;

use crate::error_handler::AiLlmError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of the conversation sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A single non-streaming completion call.
///
/// Backends send `system` first (when present), then `history` in order, then
/// `prompt` as the final user message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub history: Vec<ChatMessage>,
    pub prompt: String,
}

impl CompletionRequest {
    /// Flattens the request into the wire message list.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut out = Vec::with_capacity(self.history.len() + 2);
        if let Some(sys) = &self.system {
            out.push(ChatMessage {
                role: ChatRole::System,
                content: sys.clone(),
            });
        }
        out.extend(self.history.iter().cloned());
        out.push(ChatMessage::user(self.prompt.clone()));
        out
    }
}

/// Anything that can turn a [`CompletionRequest`] into generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the assistant text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiLlmError>;
}
