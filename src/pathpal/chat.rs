use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::PathPalState;
use crate::error::AppError;
use crate::llm::{ChatMessage, ChatReply};

/// Fixed instruction placed ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "You are Path Pal, a friendly and knowledgeable college and career \
guidance assistant for high school students. Help students explore colleges, understand their \
admission odds, plan extracurricular activities, discover careers, and build a realistic plan \
toward their goals. Give clear, encouraging, practical advice, ask a clarifying question when a \
request is ambiguous, and keep answers concise.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns exactly as the browser sent them.
    #[serde(default)]
    pub context: Vec<Value>,
}

/// `[system, ...context, user(message)]`, context spliced in unchanged.
pub fn compose_messages(request: ChatRequest) -> Vec<Value> {
    let mut messages: Vec<Value> = Vec::with_capacity(request.context.len() + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT).into());
    messages.extend(request.context);
    messages.push(ChatMessage::user(request.message).into());
    messages
}

/// POST /api/chat: relay one conversation turn to the chat-completion API.
///
/// The credential check runs before the body is even parsed, so a server with
/// no key answers the same way to every request.
pub async fn handle_chat(
    State(state): State<PathPalState>,
    body: Bytes,
) -> Result<Json<ChatReply>, AppError> {
    let Some(api_key) = state.config.gpt_api_key.as_deref() else {
        return Err(AppError::NotConfigured("GPT API key not configured".into()));
    };

    let request: ChatRequest = serde_json::from_slice(&body)?;
    tracing::debug!(context_len = request.context.len(), "Chat request received");

    let messages = compose_messages(request);
    let reply = state.chat.complete(api_key, &messages).await?;
    Ok(Json(reply))
}
