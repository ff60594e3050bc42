//! Cache-hint composer: decides how the cacheable context (the CV) rides along with a prompt.
//!
//! Gemini has no prompt caching on the `generateContent` path we use, so the
//! context is prepended to the prompt text on every call. That only mimics the
//! behaviour: no tokens are saved. OpenAI receives the context as its own
//! system message tagged `cache_control: ephemeral`, followed by the prompt as
//! the user message.
//!
//! Neither function touches the prompt text itself.

use serde::{Deserialize, Serialize};

/// Label placed in front of the inlined context.
pub const CACHEABLE_CONTEXT_LABEL: &str = "CV (cacheable)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheControl {
    #[serde(rename = "type")]
    pub kind: String,
}

impl CacheControl {
    pub fn ephemeral() -> Self {
        Self {
            kind: "ephemeral".to_string(),
        }
    }
}

/// A chat-completions message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<CacheControl>,
}

impl ChatMessage {
    pub fn system_cacheable(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
            cache_control: Some(CacheControl::ephemeral()),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
            cache_control: None,
        }
    }
}

/// Single-field composition: `"<label>:\n<context>\n\n<prompt>"`, or the prompt alone.
pub fn compose_inline(context: Option<&str>, prompt: &str) -> String {
    match context.filter(|c| !c.trim().is_empty()) {
        Some(context) => format!("{CACHEABLE_CONTEXT_LABEL}:\n{context}\n\n{prompt}"),
        None => prompt.to_string(),
    }
}

/// Two-message composition. The system block is left out when there is no context.
pub fn compose_messages(context: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        messages.push(ChatMessage::system_cacheable(context));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}
