//! Completion-endpoint interaction: build the two-message conversation and
//! call the service.
//!
//! This module is intentionally thin — all prompt text lives in
//! [`crate::prompts`] and [`crate::pipeline::prompt`] so it can change
//! without touching transport or error mapping here.
//!
//! ## One attempt, no retry
//!
//! A submission makes exactly one synchronous request. There is no backoff
//! loop and no timeout override beyond the HTTP client's default: a failed
//! call is mapped to a [`RequestError`] and the orchestrator degrades the
//! run to the fixed fallback feedback instead of retrying.

use crate::config::FeedbackConfig;
use crate::error::RequestError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// One message of the chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Fixed per-request completion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// The primary completion choice plus token accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Seam between the pipeline and the completion service.
///
/// The pipeline only ever needs "messages in, text out"; hiding the
/// transport behind this trait lets tests inject scripted successes and
/// failures without any network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one conversation and return the primary choice's text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, RequestError>;
}

/// Map the fixed service constants from the config onto request options.
pub fn build_options(config: &FeedbackConfig) -> CompletionOptions {
    CompletionOptions {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Send the finished prompt, with the system instruction, as a single
/// completion attempt.
pub async fn request_feedback(
    client: &Arc<dyn CompletionClient>,
    system_prompt: &str,
    user_prompt: &str,
    config: &FeedbackConfig,
) -> Result<Completion, RequestError> {
    let messages = [
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_prompt),
    ];
    let options = build_options(config);

    let completion = client.complete(&messages, &options).await?;
    debug!(
        "Completion received: {} prompt tokens, {} completion tokens",
        completion.prompt_tokens, completion.completion_tokens
    );
    Ok(completion)
}

// ── OpenAI-compatible client ─────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// [`CompletionClient`] over any OpenAI-compatible `/chat/completions`
/// endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Client against the default OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different OpenAI-compatible base URL
    /// (Azure gateways, proxies, local servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, RequestError> {
        let body = ChatCompletionRequest {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!("Sending completion request: model={}", options.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RequestError::Network {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => RequestError::Auth {
                    detail: read_error_body(response).await,
                },
                429 => RequestError::RateLimit {
                    retry_after_secs: retry_after(&response),
                },
                code => RequestError::Api {
                    status: code,
                    message: read_error_body(response).await,
                },
            });
        }

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| RequestError::MalformedResponse {
                    detail: e.to_string(),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RequestError::MalformedResponse {
                detail: "response contained no completion choices".to_string(),
            })?;

        let (prompt_tokens, completion_tokens) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        Ok(Completion {
            content,
            prompt_tokens,
            completion_tokens,
        })
    }
}

/// Parse a `Retry-After` header if the server sent one in seconds.
fn retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Read the error body, truncated to keep messages displayable.
async fn read_error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else if trimmed.len() > 400 {
        let mut cut = 400;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &trimmed[..cut])
    } else {
        trimmed.to_string()
    }
}
