//! OpenAI-compatible chat-completion client.
//!
//! Works against any provider exposing `POST {base_url}/chat/completions`
//! (OpenAI, LM Studio, Ollama, proxies). Transient failures (timeout, 429,
//! 5xx) are retried with exponential backoff; everything else surfaces
//! immediately.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default retry cap for transient failures.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL for the API (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model name, also the key into the pricing table.
    pub model: String,
    /// Optional bearer token. Some local providers require none.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retries for transient failures.
    pub max_retries: u32,
}

impl ChatConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var             | Required | Default                     |
    /// |---------------------|----------|-----------------------------|
    /// | `LLM_BASE_URL`      | no       | `https://api.openai.com/v1` |
    /// | `LLM_MODEL`         | no       | `gpt-4o-mini`               |
    /// | `LLM_API_KEY`       | no       | --                          |
    /// | `LLM_TIMEOUT_SECS`  | no       | `120`                       |
    /// | `LLM_MAX_RETRIES`   | no       | `3`                         |
    pub fn from_env() -> Self {
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let api_key = std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        let max_retries: u32 = std::env::var("LLM_MAX_RETRIES")
            .unwrap_or_else(|_| DEFAULT_MAX_RETRIES.to_string())
            .parse()
            .expect("LLM_MAX_RETRIES must be a valid u32");

        Self {
            base_url,
            model,
            api_key,
            timeout_secs,
            max_retries,
        }
    }
}

/// One message in a chat exchange (request or response side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Token usage block reported by the provider.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// The assistant's reply plus usage, when the provider reports it.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: Option<ChatUsage>,
}

/// Abstraction over the chat-completion call so the dispatcher and poller
/// can be tested with a stub provider.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, AiError>;

    /// Model name used for pricing lookups.
    fn model(&self) -> &str;
}

/// Real HTTP client for OpenAI-compatible providers.
pub struct ChatClient {
    config: ChatConfig,
    client: Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    async fn try_request(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, AiError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let mut request = self.client.post(&url).json(&CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: 0.2,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout(e.to_string())
            } else {
                AiError::Provider(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited(format!("{url} returned 429")));
        }
        if status.is_server_error() {
            return Err(AiError::Unavailable(format!("{url} returned {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Provider(format!("{url} returned {status}: {body}")));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(format!("Malformed completion body: {e}")))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::InvalidResponse("Completion had no choices".into()))?;

        Ok(ChatCompletion {
            content: choice.message.content,
            usage: body.usage,
        })
    }
}

/// Run `op`, retrying transient failures with exponential backoff
/// (1s, 2s, 4s, ...). Non-transient errors surface immediately.
async fn retry_transient<T, F, Fut>(max_retries: u32, mut op: F) -> Result<T, AiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(2u64.pow(attempt - 1));
            tokio::time::sleep(delay).await;
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_retries => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max = max_retries + 1,
                    error = %e,
                    "Chat completion failed, retrying",
                );
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| AiError::Internal("All retry attempts failed".into())))
}

#[async_trait]
impl ChatProvider for ChatClient {
    /// Send a request, retrying transient failures with backoff.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, AiError> {
        retry_transient(self.config.max_retries, || self.try_request(messages)).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
