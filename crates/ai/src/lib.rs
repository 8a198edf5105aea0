//! `bizlens-ai`
//!
//! **Responsibility:** the chat-assistant boundary.
//!
//! Stateless prompt forwarding to a third-party chat-completion API:
//! - one request in, one text reply (plus token usage) out
//! - no retrieval, no orchestration, no conversation state (callers send history)
//! - rate limiting upstream is reported as `AiError::RateLimited`, not a crash

pub mod assistant;
pub mod chat;
pub mod client;
pub mod insights;
pub mod result;

pub use assistant::{ChatAssistant, DisabledAssistant};
pub use chat::{ChatMessage, ChatRequest, ChatRole};
pub use client::{ChatClientConfig, OpenAiChatClient};
pub use insights::insight_prompt;
pub use result::{AiError, ChatReply, TokenUsage};
