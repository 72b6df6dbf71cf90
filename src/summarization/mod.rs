//! Abstractions for generating document summaries through a chat-completion API.
//!
//! The upload pipeline depends only on [`SummarizationClient`]; the OpenAI-compatible adapter
//! issues HTTP requests directly with `reqwest`, and tests substitute their own implementations.

pub mod prompt;

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors surfaced while attempting summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached or the client could not be built.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed or carried no usable content.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that frame the conversation.
    System,
    /// The end-user turn.
    User,
}

/// A single role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// System-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// User-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone, Serialize)]
pub struct SummarizationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Ordered conversation sent to the model.
    pub messages: Vec<ChatMessage>,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl SummarizationRequest {
    /// Standard document-summary request for `text` using `model`.
    pub fn for_document(model: impl Into<String>, text: &str) -> Self {
        Self {
            model: model.into(),
            messages: prompt::build_messages(text),
            max_tokens: prompt::MAX_OUTPUT_TOKENS,
            temperature: prompt::TEMPERATURE,
        }
    }
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary for the supplied conversation.
    ///
    /// Implementations return trimmed, non-empty text on success and never retry.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiSummarizationClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for OpenAiSummarizationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizationClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiSummarizationClient {
    /// Build a client against `base_url` (for example `https://api.openai.com/v1`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        Self::new(&config.openai_base_url, &config.openai_api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "{} ({})",
            envelope
                .error
                .message
                .unwrap_or_else(|| "unknown error".into()),
            envelope.error.kind.unwrap_or_else(|| "api_error".into())
        ),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl SummarizationClient for OpenAiSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "Requesting chat completion"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "provider returned {status}: {}",
                describe_error_body(&body)
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode chat completion: {error}"
            ))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(SummarizationClientError::InvalidResponse(
                "chat completion contained no message content".into(),
            ));
        }

        Ok(content)
    }
}
