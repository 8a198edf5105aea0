use async_trait::async_trait;

use crate::chat::ChatRequest;
use crate::result::{AiError, ChatReply};

/// Chat completion seam.
///
/// Implementations forward a single request and return the reply; they keep
/// no conversation state between calls.
#[async_trait]
pub trait ChatAssistant: Send + Sync + 'static {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AiError>;
}

/// Assistant used when no API key is configured.
#[derive(Debug, Copy, Clone, Default)]
pub struct DisabledAssistant;

#[async_trait]
impl ChatAssistant for DisabledAssistant {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AiError> {
        request.validate()?;
        Err(AiError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_assistant_validates_before_refusing() {
        let assistant = DisabledAssistant;
        assert!(matches!(
            assistant.chat(&ChatRequest::new("")).await,
            Err(AiError::InvalidInput(_))
        ));
        assert!(matches!(
            assistant.chat(&ChatRequest::new("hello")).await,
            Err(AiError::NotConfigured)
        ));
    }
}
