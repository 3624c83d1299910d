use std::fmt;
use std::path::{Path, PathBuf};

use super::Tag;

/// Terminal status of processing a single note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// New tags were merged into the note.
    TagsUpdated,
    /// The note already carried enough tags and was left untouched.
    ExistingTags,
    /// Reading, tag generation or writing failed.
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagsUpdated => write!(f, "tags_updated"),
            Self::ExistingTags => write!(f, "existing_tags"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of handling one note. Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOutcome {
    status: OutcomeStatus,
    path: PathBuf,
    tags: Vec<Tag>,
    reason: Option<String>,
}

impl ProcessingOutcome {
    pub fn updated(path: impl Into<PathBuf>, tags: Vec<Tag>) -> Self {
        Self {
            status: OutcomeStatus::TagsUpdated,
            path: path.into(),
            tags,
            reason: None,
        }
    }

    pub fn existing(path: impl Into<PathBuf>, tags: Vec<Tag>) -> Self {
        Self {
            status: OutcomeStatus::ExistingTags,
            path: path.into(),
            tags,
            reason: None,
        }
    }

    /// A failed outcome never carries tags.
    pub fn failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failed,
            path: path.into(),
            tags: Vec::new(),
            reason: Some(reason.into()),
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Why processing failed, for failed outcomes.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}
