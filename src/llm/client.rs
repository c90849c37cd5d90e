use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::llm::types::{ChatReply, CompletionRequestBody, CompletionResponse, UpstreamErrorBody};

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f64 = 0.7;
/// Upper bound on generated tokens per reply.
pub const MAX_TOKENS: u32 = 1000;

const DEFAULT_UPSTREAM_ERROR: &str = "Failed to get response from GPT API";

/// Anything that can turn a prepared message list into a single reply.
///
/// The web layer only sees this trait, so tests can swap in a canned backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, api_key: &str, messages: &[Value]) -> Result<ChatReply, AppError>;
}

// ============================================================================
// OpenAiChatClient
// ============================================================================

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl OpenAiChatClient {
    /// No request timeout beyond reqwest's defaults; a slow completion is
    /// waited out.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            url: url.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatClient {
    async fn complete(&self, api_key: &str, messages: &[Value]) -> Result<ChatReply, AppError> {
        let body = CompletionRequestBody {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = upstream_error_message(&text);
            tracing::warn!(status = %status, "Chat completion rejected upstream: {}", message);
            return Err(AppError::Upstream { status, message });
        }

        let completion: CompletionResponse = resp.json().await?;
        let first = completion.choices.into_iter().next().ok_or_else(|| {
            tracing::warn!("Chat completion returned no choices");
            AppError::Internal("Failed to process request".into())
        })?;

        tracing::debug!(model = %self.model, "Chat completion relayed");
        Ok(ChatReply {
            message: first.message.content,
            usage: completion.usage,
        })
    }
}

/// Pull `error.message` out of an upstream error payload, if there is one.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_UPSTREAM_ERROR.to_string())
}
