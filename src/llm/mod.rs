pub mod client;
pub mod types;

pub use client::{ChatBackend, OpenAiChatClient};
pub use types::{ChatMessage, ChatReply};
