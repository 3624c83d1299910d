use std::fmt;

use thiserror::Error;

use crate::models::Tag;

/// Errors that can occur when asking a backend for tag suggestions.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The response body was not the JSON we expected
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The backend answered but reported an error or returned nothing usable
    #[error("{backend} API error: {message}")]
    Api {
        backend: &'static str,
        message: String,
    },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The remote backend was built without credentials
    #[error("Missing API key")]
    MissingApiKey,
}

impl BackendError {
    /// Classifies a transport failure from `reqwest`.
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Which kind of backend produced the suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// A locally served model (Ollama).
    Local,
    /// The hosted Claude API.
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "Ollama"),
            Self::Remote => write!(f, "Claude API"),
        }
    }
}

/// Token usage reported by a single backend call.
///
/// Backends that report nothing yield zero usage; that is not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    input: u64,
    output: u64,
}

impl TokenUsage {
    pub fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }

    /// Builds usage from whichever counters a backend reported.
    ///
    /// Separate input/output counts win; a lone total is used only when
    /// neither is present.
    pub fn from_counts(input: Option<u64>, output: Option<u64>, total: Option<u64>) -> Self {
        match (input, output) {
            (None, None) => Self::new(0, total.unwrap_or(0)),
            (input, output) => Self::new(input.unwrap_or(0), output.unwrap_or(0)),
        }
    }

    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// Tags suggested by one backend call together with the usage it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub tags: Vec<Tag>,
    pub usage: TokenUsage,
}

/// A service that suggests tags for note content.
///
/// Implemented by [`OllamaClient`](super::OllamaClient) and
/// [`ClaudeClient`](super::ClaudeClient); tests substitute their own.
pub trait TagBackend: Send + Sync {
    /// Which kind of backend this is.
    fn kind(&self) -> BackendKind;

    /// Asks the backend for tags describing `content`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, a non-success status or a
    /// malformed response. No tags are produced in that case.
    fn suggest(&self, content: &str) -> Result<Suggestion, BackendError>;
}

/// Splits generated text into tags on whitespace.
pub fn tokenize_tags(text: &str) -> Vec<Tag> {
    text.split_whitespace().filter_map(Tag::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_includes_status_code() {
        let error = BackendError::Http { status: 529 };
        assert_eq!(error.to_string(), "HTTP error: status 529");
    }

    #[test]
    fn api_error_names_backend() {
        let error = BackendError::Api {
            backend: "Ollama",
            message: "model 'llama9' not found".to_string(),
        };
        assert_eq!(error.to_string(), "Ollama API error: model 'llama9' not found");
    }

    #[test]
    fn serialization_error_keeps_source() {
        use std::error::Error;

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = BackendError::Serialization(json_error);
        assert!(error.source().is_some());
    }

    #[test]
    fn usage_prefers_split_counts() {
        assert_eq!(TokenUsage::from_counts(Some(10), Some(5), Some(99)).total(), 15);
        assert_eq!(TokenUsage::from_counts(Some(10), None, None).total(), 10);
    }

    #[test]
    fn usage_falls_back_to_total() {
        assert_eq!(TokenUsage::from_counts(None, None, Some(42)).total(), 42);
        assert_eq!(TokenUsage::from_counts(None, None, None).total(), 0);
    }

    #[test]
    fn tokenize_prefixes_and_drops_empty_tokens() {
        let tags = tokenize_tags("  #history rome\n# #empire  ");
        let names: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(names, ["#history", "#rome", "#empire"]);
    }

    #[test]
    fn backend_kind_display() {
        assert_eq!(BackendKind::Local.to_string(), "Ollama");
        assert_eq!(BackendKind::Remote.to_string(), "Claude API");
    }
}
