//! LLM provider trait for chat completion

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// One role-tagged message of a chat exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Trait for chat-completion backends
///
/// Implementations:
/// - `OpenAiClient`: OpenAI-compatible `/chat/completions`
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `messages` and return the generated text of the first choice
    async fn chat(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_serialize_lowercase() {
        let value = serde_json::to_value([
            ChatMessage::system("be brief"),
            ChatMessage::user("hello"),
        ])
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hello"}
            ])
        );
    }
}
