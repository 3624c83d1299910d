//! Startup configuration.
//!
//! Everything is resolved once, before any note is read. Values come from
//! command-line overrides first, then the environment (which `main` seeds
//! from a `.env` file), then built-in defaults.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::backend::{
    BackendError, BackendKind, ClaudeClientBuilder, DEFAULT_CLAUDE_MODEL, DEFAULT_OLLAMA_HOST,
    OllamaClientBuilder, TagBackend,
};

pub const ENV_NOTES_DIR: &str = "OBSIDIAN_DIRECTORY";
pub const ENV_USE_OLLAMA: &str = "USE_OLLAMA";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
pub const ENV_CLAUDE_API_KEY: &str = "CLAUDE_API_KEY";
pub const ENV_CLAUDE_MODEL: &str = "CLAUDE_MODEL";

const DEFAULT_OLLAMA_MODEL: &str = "llama2";

/// Missing or unusable configuration. Always fatal, before any file is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set and no directory was given", var = ENV_NOTES_DIR)]
    MissingNotesDir,

    #[error("{var} is not set and Ollama is not enabled", var = ENV_CLAUDE_API_KEY)]
    MissingApiKey,
}

/// Values supplied on the command line, overriding the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub notes_dir: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub model: Option<String>,
    pub dry_run: bool,
}

/// How to reach the selected backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSettings {
    Local { model: String, host: Option<String> },
    Remote { api_key: String, model: String },
}

impl BackendSettings {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local { .. } => BackendKind::Local,
            Self::Remote { .. } => BackendKind::Remote,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Local { model, .. } | Self::Remote { model, .. } => model,
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub notes_dir: PathBuf,
    pub backend: BackendSettings,
    pub dry_run: bool,
}

impl Config {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the notes directory or, for the remote
    /// backend, the API key is missing.
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration using `lookup` in place of the environment.
    ///
    /// Empty values are treated as unset.
    pub fn resolve<F>(overrides: Overrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let notes_dir = overrides
            .notes_dir
            .or_else(|| var(ENV_NOTES_DIR).map(PathBuf::from))
            .ok_or(ConfigError::MissingNotesDir)?;

        let kind = overrides.backend.unwrap_or_else(|| {
            if var(ENV_USE_OLLAMA).is_some_and(|v| is_truthy(&v)) {
                BackendKind::Local
            } else {
                BackendKind::Remote
            }
        });

        let backend = match kind {
            BackendKind::Local => BackendSettings::Local {
                model: overrides
                    .model
                    .or_else(|| var(ENV_OLLAMA_MODEL))
                    .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                host: var(ENV_OLLAMA_HOST),
            },
            BackendKind::Remote => BackendSettings::Remote {
                api_key: var(ENV_CLAUDE_API_KEY).ok_or(ConfigError::MissingApiKey)?,
                model: overrides
                    .model
                    .or_else(|| var(ENV_CLAUDE_MODEL))
                    .unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
            },
        };

        Ok(Self {
            notes_dir,
            backend,
            dry_run: overrides.dry_run,
        })
    }

    /// Constructs the configured backend client.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the client cannot be built, e.g. because of
    /// an invalid host URL.
    pub fn build_backend(&self) -> Result<Arc<dyn TagBackend>, BackendError> {
        let backend: Arc<dyn TagBackend> = match &self.backend {
            BackendSettings::Local { model, host } => Arc::new(
                OllamaClientBuilder::new()
                    .model(model)
                    .base_url(host.as_deref().unwrap_or(DEFAULT_OLLAMA_HOST))
                    .build()?,
            ),
            BackendSettings::Remote { api_key, model } => Arc::new(
                ClaudeClientBuilder::new()
                    .api_key(api_key)
                    .model(model)
                    .build()?,
            ),
        };
        Ok(backend)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
