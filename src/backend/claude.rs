//! Remote backend: the Claude Messages API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompt::INSTRUCTIONS;
use super::types::{BackendError, BackendKind, Suggestion, TagBackend, TokenUsage, tokenize_tags};

const BACKEND: &str = "Claude";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;

/// Builder for constructing `ClaudeClient` instances.
///
/// # Examples
///
/// ```
/// use notetag::backend::ClaudeClientBuilder;
///
/// let client = ClaudeClientBuilder::new()
///     .api_key("sk-ant-example")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "claude-3-opus-20240229");
/// ```
#[derive(Debug, Default)]
pub struct ClaudeClientBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl ClaudeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key sent in the `x-api-key` header.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model name; defaults to `claude-3-opus-20240229`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the API host, e.g. for a proxy.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `ClaudeClient`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MissingApiKey` when no non-empty key was given
    /// and `BackendError::InvalidUrl` when the base URL does not parse.
    pub fn build(self) -> Result<ClaudeClient, BackendError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(BackendError::MissingApiKey)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(BackendError::Network)?;

        Ok(ClaudeClient {
            client,
            api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url,
        })
    }
}

/// Blocking client for the hosted Claude API.
pub struct ClaudeClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct Usage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

impl ClaudeClient {
    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, content: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: INSTRUCTIONS,
            messages: [Message {
                role: "user",
                content,
            }],
        }
    }
}

impl TagBackend for ClaudeClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn suggest(&self, content: &str) -> Result<Suggestion, BackendError> {
        let url = format!("{}/v1/messages", self.base_url);

        info!(model = %self.model, "Sending request to Claude API");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(content))
            .send()
            .map_err(BackendError::transport)?;

        let status = response.status();
        let body = response.text().map_err(BackendError::transport)?;
        if !status.is_success() {
            debug!(status = status.as_u16(), %body, "Claude API returned an error status");
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }

        let (text, usage) = parse_response(&body)?;
        let tags = tokenize_tags(&text);
        info!(count = tags.len(), "Received tags from Claude API");
        Ok(Suggestion { tags, usage })
    }
}

/// Pulls the generated text and usage out of a Messages API response.
fn parse_response(body: &str) -> Result<(String, TokenUsage), BackendError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(BackendError::Serialization)?;

    let text = response
        .content
        .into_iter()
        .find_map(|block| block.text)
        .ok_or_else(|| BackendError::Api {
            backend: BACKEND,
            message: "response contained no text".to_string(),
        })?;

    let usage = TokenUsage::from_counts(
        response.usage.input_tokens,
        response.usage.output_tokens,
        response.usage.total_tokens,
    );
    Ok((text, usage))
}
