use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token accounting reported by the completion API.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Reply of a single chat call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("assistant is not configured")]
    NotConfigured,

    /// Upstream returned 429. Callers show a "try again" message.
    #[error("rate limited by the completion API")]
    RateLimited,

    #[error("completion API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode completion response: {0}")]
    Decode(String),
}

impl AiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AiError::RateLimited)
    }
}
