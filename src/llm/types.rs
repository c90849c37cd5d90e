use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A turn this service authors itself (system prompt, the user's new message).
///
/// Caller-supplied history is never decoded into this type; it travels as raw
/// JSON so unknown keys and structured `content` reach the upstream untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

impl From<ChatMessage> for Value {
    fn from(message: ChatMessage) -> Self {
        serde_json::json!({ "role": message.role, "content": message.content })
    }
}

/// Successful relay result: the first choice's `content` plus the upstream
/// token accounting, both passed through untouched. `content` may be `null`
/// (refusals, tool calls) and is relayed as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: Value,
    pub usage: Value,
}

// ============================================================================
// Upstream wire types
// ============================================================================

#[derive(Serialize)]
pub(crate) struct CompletionRequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Value],
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionMessage {
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpstreamErrorBody {
    pub error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpstreamErrorDetail {
    pub message: Option<String>,
}
