//! Local backend: a model served by Ollama.
//!
//! `/api/generate` streams its answer as newline-delimited JSON fragments.
//! Each fragment carries a piece of the generated text; the last one also
//! carries the token counts.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompt::local_prompt;
use super::types::{BackendError, BackendKind, Suggestion, TagBackend, TokenUsage, tokenize_tags};

const BACKEND: &str = "Ollama";
/// Where Ollama listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama2";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use notetag::backend::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("llama3.1:8b")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "llama3.1:8b");
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
}

impl OllamaClientBuilder {
    /// Creates a new `OllamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the Ollama API (e.g. "http://localhost:11434").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name used for generation.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the `OllamaClient`.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, `OLLAMA_HOST` is used, falling back to
    /// `http://localhost:11434`. If `model()` was not called, `OLLAMA_MODEL`
    /// is used, falling back to `llama2`. Blank variables count as unset.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<OllamaClient, BackendError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => env_or("OLLAMA_HOST", DEFAULT_BASE_URL),
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        let model = match self.model {
            Some(m) => m,
            None => env_or("OLLAMA_MODEL", DEFAULT_MODEL),
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(BackendError::Network)?;

        Ok(OllamaClient {
            client,
            base_url,
            model,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Blocking client for a locally served Ollama model.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct GenerateFragment {
    #[serde(default)]
    response: String,
    error: Option<String>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    total_tokens: Option<u64>,
}

impl OllamaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<(String, TokenUsage), BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
        };

        info!(model = %self.model, "Sending request to Ollama");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(BackendError::transport)?;

        let status = response.status();
        let body = response.text().map_err(BackendError::transport)?;
        if !status.is_success() {
            debug!(status = status.as_u16(), %body, "Ollama returned an error status");
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }

        parse_stream(&body)
    }
}

impl TagBackend for OllamaClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn suggest(&self, content: &str) -> Result<Suggestion, BackendError> {
        let (text, usage) = self.generate(&local_prompt(content))?;
        let tags = tokenize_tags(&text);
        info!(count = tags.len(), "Received tags from Ollama");
        Ok(Suggestion { tags, usage })
    }
}

/// Reassembles a streamed `/api/generate` body into text and usage.
///
/// Fragments are concatenated in order. Usage comes from the last fragment,
/// which is the only one Ollama attaches counters to.
fn parse_stream(body: &str) -> Result<(String, TokenUsage), BackendError> {
    let mut text = String::new();
    let mut last = None;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let fragment: GenerateFragment =
            serde_json::from_str(line).map_err(BackendError::Serialization)?;
        if let Some(message) = fragment.error {
            return Err(BackendError::Api {
                backend: BACKEND,
                message,
            });
        }
        text.push_str(&fragment.response);
        last = Some(fragment);
    }

    let Some(last) = last else {
        return Err(BackendError::Api {
            backend: BACKEND,
            message: "empty response body".to_string(),
        });
    };

    let usage = TokenUsage::from_counts(last.prompt_eval_count, last.eval_count, last.total_tokens);
    Ok((text, usage))
}
