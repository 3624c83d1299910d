//! Tag suggestion backends.
//!
//! Both backends sit behind the [`TagBackend`] trait so the rest of the
//! pipeline never branches on which one is in use. [`OllamaClient`] talks to
//! a locally served model, [`ClaudeClient`] to the hosted Claude API.
mod claude;
mod ollama;
mod prompt;
mod types;

pub use claude::{ClaudeClient, ClaudeClientBuilder, DEFAULT_MODEL as DEFAULT_CLAUDE_MODEL};
pub use ollama::{DEFAULT_BASE_URL as DEFAULT_OLLAMA_HOST, OllamaClient, OllamaClientBuilder};
pub use prompt::{INSTRUCTIONS, local_prompt};
pub use types::{BackendError, BackendKind, Suggestion, TagBackend, TokenUsage, tokenize_tags};
