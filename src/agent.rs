//! LLM agent module for structured summarization.
//!
//! Sends one request per summarization to a Messages-style endpoint and parses
//! the reply text into a [`DiscussionSummary`] or [`CommentSummary`].

pub use crate::discussion::{CommentSummary, DiscussionSummary};

use crate::config::{Config, ConfigError};
use crate::discussion::Comment;
use crate::prompt::{comment_prompt, discussion_prompt, SYSTEM_PROMPT};
use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Longest error body kept in a transport error message
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    Transport(String),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification of an [`AgentError`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service could not be reached or answered with an error status
    Transport,
    /// The service answered but the reply was not the expected JSON
    Parse,
    /// The request was never sent
    Config,
}

impl AgentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AgentError::Transport(_) => FailureKind::Transport,
            AgentError::Parse(_) => FailureKind::Parse,
            AgentError::Config(_) => FailureKind::Config,
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(error: reqwest::Error) -> Self {
        AgentError::Transport(error.to_string())
    }
}

/// A text-generation backend: one system instruction plus one user message in,
/// the raw reply text out.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError>;
}

/// Client for the Anthropic Messages API, or a proxy exposing the same shape.
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Build a client from config. Fails when no API key is configured.
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?.to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.agent.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.agent.endpoint.clone(),
            api_key,
            api_version: config.agent.api_version.clone(),
            model: config.agent.model.clone(),
            max_tokens: config.agent.max_tokens,
        })
    }

    /// Build the Messages API request for one system instruction and one user turn.
    pub fn build_request(&self, system: &str, user: &str) -> reqwest::Result<Request> {
        let payload = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": [
                {
                    "role": "user",
                    "content": user
                }
            ]
        });

        self.client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&payload)
            .build()
    }
}

#[async_trait]
impl Completion for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError> {
        info!(
            model = %self.model,
            prompt_chars = user.len(),
            "sending summarization request"
        );

        let request = self.build_request(system, user)?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        let text = read_reply(status, &body)?;
        debug!(reply_chars = text.len(), "received summarization reply");
        Ok(text)
    }
}

/// Turn a settled HTTP reply into the model's text.
///
/// Non-success statuses are transport failures; a success body without text
/// content is a parse failure.
pub fn read_reply(status: StatusCode, body: &str) -> Result<String, AgentError> {
    if !status.is_success() {
        let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        warn!(%status, "summarization request rejected");
        return Err(AgentError::Transport(format!("status {status}: {snippet}")));
    }

    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| AgentError::Parse(format!("reply envelope: {e}")))?;
    extract_text(&envelope)
        .ok_or_else(|| AgentError::Parse("reply carried no text content".to_string()))
}

/// Concatenate the text blocks of a Messages API reply.
pub fn extract_text(envelope: &Value) -> Option<String> {
    let content = envelope.get("content").and_then(Value::as_array)?;
    let chunks: Vec<&str> = content
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.concat())
    }
}

/// Strip markdown code block wrappers from a JSON reply.
///
/// The opening and closing fences are removed independently, so a reply with
/// only one of them still parses.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let rest = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse a reply into one of the digest shapes after fence-stripping.
pub fn parse_reply<T: DeserializeOwned>(text: &str) -> Result<T, AgentError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned).map_err(|e| {
        warn!(error = %e, "summarization reply was not valid JSON");
        AgentError::Parse(e.to_string())
    })
}

/// Send one user prompt with the fixed system instruction and parse the reply.
pub async fn request<T: DeserializeOwned>(
    backend: &dyn Completion,
    prompt: &str,
) -> Result<T, AgentError> {
    let reply = backend.complete(SYSTEM_PROMPT, prompt).await?;
    parse_reply(&reply)
}

/// Summarize the whole thread with one request.
pub async fn summarize_discussion(
    backend: &dyn Completion,
    comments: &[Comment],
) -> Result<DiscussionSummary, AgentError> {
    request(backend, &discussion_prompt(comments)).await
}

/// Summarize a single comment with one request.
pub async fn summarize_comment(
    backend: &dyn Completion,
    comment: &Comment,
) -> Result<CommentSummary, AgentError> {
    request(backend, &comment_prompt(comment)).await
}
