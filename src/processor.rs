//! Per-note orchestration: read, decide, ask the backend, merge, write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::backend::{BackendError, TagBackend};
use crate::models::{ProcessingOutcome, RunStatistics, Tag, join_tags};
use crate::tagger::{MAX_TAGS, extract_tags, merge_tags, replace_or_append};
use crate::walker::{NoteWalker, WalkError};

/// A note with at least this many tags is left alone.
pub const ENOUGH_TAGS: usize = 9;

/// How many oversized suggestions are tolerated before giving up on a note.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Reasons a single note could not be tagged.
///
/// None of these abort a run; they become a failed [`ProcessingOutcome`].
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(
        "Backend returned more than {max} tags on {attempts} attempts (last: {count})",
        max = MAX_TAGS
    )]
    TooManyTags { attempts: usize, count: usize },
}

/// Tags notes one at a time using a single backend.
///
/// Transport and protocol failures from the backend fail the note
/// immediately. Only a response with more than [`MAX_TAGS`] tags is retried,
/// up to the configured number of attempts.
pub struct FileProcessor {
    backend: Arc<dyn TagBackend>,
    max_attempts: usize,
    dry_run: bool,
}

impl FileProcessor {
    pub fn new(backend: Arc<dyn TagBackend>) -> Self {
        Self {
            backend,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            dry_run: false,
        }
    }

    /// Sets how many backend responses may be requested per note.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// When set, merged tags are computed and reported but never written.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes every path in order and collects the outcomes.
    pub fn process_all<I>(&self, paths: I, stats: &mut RunStatistics) -> Vec<ProcessingOutcome>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        paths
            .into_iter()
            .map(|path| self.process(&path, stats))
            .collect()
    }

    /// Processes one note. Never fails; errors become a failed outcome.
    pub fn process(&self, path: &Path, stats: &mut RunStatistics) -> ProcessingOutcome {
        info!(path = %path.display(), "Processing file");
        match self.try_process(path, stats) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to tag note");
                ProcessingOutcome::failed(path, e.to_string())
            }
        }
    }

    fn try_process(
        &self,
        path: &Path,
        stats: &mut RunStatistics,
    ) -> Result<ProcessingOutcome, ProcessError> {
        let content = fs::read_to_string(path).map_err(|source| ProcessError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let existing = extract_tags(&content);
        if existing.len() >= ENOUGH_TAGS {
            info!(tags = %join_tags(&existing), "{ENOUGH_TAGS} or more existing tags found");
            return Ok(ProcessingOutcome::existing(path, existing));
        }

        info!(
            existing = existing.len(),
            "Fewer than {ENOUGH_TAGS} existing tags found, generating more"
        );
        let suggested = self.request_tags(&content, stats)?;
        let merged = merge_tags(&existing, &suggested);
        let updated = replace_or_append(&content, &merged);

        if self.dry_run {
            info!(tags = %join_tags(&merged), "Dry run, not writing");
        } else {
            fs::write(path, updated).map_err(|source| ProcessError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(tags = %join_tags(&merged), "Updated tags");
        }

        Ok(ProcessingOutcome::updated(path, merged))
    }

    /// Asks the backend for tags, retrying only oversized answers.
    fn request_tags(
        &self,
        content: &str,
        stats: &mut RunStatistics,
    ) -> Result<Vec<Tag>, ProcessError> {
        let mut last_count = 0;

        for attempt in 1..=self.max_attempts {
            stats.record_call();
            let suggestion = self.backend.suggest(content)?;
            stats.record_usage(suggestion.usage);

            if suggestion.tags.len() <= MAX_TAGS {
                return Ok(suggestion.tags);
            }

            last_count = suggestion.tags.len();
            warn!(
                attempt,
                count = last_count,
                "Backend returned more than {MAX_TAGS} tags, retrying"
            );
        }

        Err(ProcessError::TooManyTags {
            attempts: self.max_attempts,
            count: last_count,
        })
    }
}

/// Tags every note below `root`, one file at a time.
///
/// # Errors
///
/// Returns `WalkError::DirectoryNotFound` if `root` is not a directory.
/// Failures on individual notes are reported as outcomes instead.
pub fn tag_directory(
    root: &Path,
    processor: &FileProcessor,
    stats: &mut RunStatistics,
) -> Result<Vec<ProcessingOutcome>, WalkError> {
    let walker = NoteWalker::new(root)?;
    info!(root = %root.display(), "Scanning directory");
    Ok(processor.process_all(walker, stats))
}
