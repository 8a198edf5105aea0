//! HTTP client for an OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::assistant::ChatAssistant;
use crate::chat::{ChatMessage, ChatRequest};
use crate::result::{AiError, ChatReply, TokenUsage};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_SYSTEM_PROMPT: &str = "Você é um assistente de business intelligence. \
Responda de forma objetiva sobre vendas, lucro, estoque e equipe.";

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Forwards each request as one POST; no retries.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    http: reqwest::Client,
    config: ChatClientConfig,
}

impl OpenAiChatClient {
    pub fn new(config: ChatClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }
}

#[async_trait]
impl ChatAssistant for OpenAiChatClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AiError> {
        request.validate()?;

        let body = CompletionBody {
            model: &self.config.model,
            messages: request.to_messages(self.config.system_prompt.as_deref()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let resp = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(model = %self.config.model, "chat completion rate limited");
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "chat completion failed");
            return Err(AiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = resp.json().await.map_err(|e| AiError::Decode(e.to_string()))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::Decode("response has no choices".to_string()))?;

        tracing::debug!(total_tokens = parsed.usage.total_tokens, "chat completion ok");

        Ok(ChatReply {
            text,
            usage: parsed.usage,
        })
    }
}
