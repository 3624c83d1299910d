pub mod backend;
pub mod config;
pub mod models;
pub mod processor;
pub mod report;
pub mod tagger;
pub mod walker;

pub use backend::{
    BackendError, BackendKind, ClaudeClient, ClaudeClientBuilder, OllamaClient,
    OllamaClientBuilder, Suggestion, TagBackend, TokenUsage,
};
pub use config::{Config, ConfigError, Overrides};
pub use models::{OutcomeStatus, ProcessingOutcome, RunStatistics, Tag};
pub use processor::{FileProcessor, ProcessError, tag_directory};
pub use report::{RunSummary, print_summary};
pub use walker::{NoteWalker, WalkError};
