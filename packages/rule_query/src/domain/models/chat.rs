use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// One completion call: a model and the ordered conversation to send
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// A single-turn request carrying only `prompt`.
    pub fn from_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::with_history(model, &[], prompt)
    }

    /// Prior messages are kept in order and `prompt` becomes the final user turn.
    pub fn with_history(
        model: impl Into<String>,
        history: &[ChatMessage],
        prompt: impl Into<String>,
    ) -> Self {
        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(prompt));
        Self {
            model: model.into(),
            messages,
        }
    }

    /// Content of the last user message.
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Model families that need request shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// `o1*` / `o3*`: high reasoning effort, plain-text response format
    Reasoning,
    /// `gpt*`: explicit output cap
    Gpt,
    Other,
}

impl ModelFamily {
    pub fn of(model: &str) -> Self {
        if model.starts_with("o1") || model.starts_with("o3") {
            ModelFamily::Reasoning
        } else if model.starts_with("gpt") {
            ModelFamily::Gpt
        } else {
            ModelFamily::Other
        }
    }
}
