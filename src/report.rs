//! End-of-run summary.
//!
//! [`RunSummary::compute`] is a pure read of the outcomes and counters;
//! [`print_summary`] is the only part that touches the terminal.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::backend::BackendKind;
use crate::models::{OutcomeStatus, ProcessingOutcome, RunStatistics};

/// Estimated Claude price in dollars per 1000 tokens.
pub const COST_PER_1K_TOKENS: f64 = 0.08;

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Aggregated view of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_files: usize,
    pub tags_updated: usize,
    pub existing_tags: usize,
    pub failed: usize,
    pub failures: Vec<(PathBuf, String)>,
    pub started_at: OffsetDateTime,
    pub elapsed: Duration,
    pub backend_calls: u64,
    pub total_tokens: u64,
    pub backend: BackendKind,
}

impl RunSummary {
    /// Summarizes a finished run, measuring elapsed time now.
    pub fn compute(
        outcomes: &[ProcessingOutcome],
        stats: &RunStatistics,
        backend: BackendKind,
    ) -> Self {
        Self::with_elapsed(outcomes, stats, backend, stats.elapsed())
    }

    /// Summarizes a run with an explicit elapsed time.
    pub fn with_elapsed(
        outcomes: &[ProcessingOutcome],
        stats: &RunStatistics,
        backend: BackendKind,
        elapsed: Duration,
    ) -> Self {
        let count = |status: OutcomeStatus| {
            outcomes.iter().filter(|o| o.status() == status).count()
        };

        let failures = outcomes
            .iter()
            .filter(|o| o.status() == OutcomeStatus::Failed)
            .map(|o| {
                (
                    o.path().to_path_buf(),
                    o.reason().unwrap_or_default().to_string(),
                )
            })
            .collect();

        Self {
            total_files: outcomes.len(),
            tags_updated: count(OutcomeStatus::TagsUpdated),
            existing_tags: count(OutcomeStatus::ExistingTags),
            failed: count(OutcomeStatus::Failed),
            failures,
            started_at: stats.started_at(),
            elapsed,
            backend_calls: stats.backend_calls(),
            total_tokens: stats.total_tokens(),
            backend,
        }
    }

    /// Mean wall-clock time per file, or `None` when no files were seen.
    pub fn average_per_file(&self) -> Option<Duration> {
        let files = u32::try_from(self.total_files).ok().filter(|n| *n > 0)?;
        Some(self.elapsed / files)
    }

    /// Estimated API cost in dollars; only the remote backend costs money.
    pub fn estimated_cost(&self) -> Option<f64> {
        match self.backend {
            BackendKind::Remote => Some(self.total_tokens as f64 / 1000.0 * COST_PER_1K_TOKENS),
            BackendKind::Local => None,
        }
    }
}

/// Renders the summary as colored console text.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "\n{CYAN}{BOLD}=== Run Statistics ==={RESET}");
    let _ = writeln!(out, "Total files processed:    {:>6}", summary.total_files);
    let _ = writeln!(out, "{GREEN}Files with tags updated:  {:>6}{RESET}", summary.tags_updated);
    let _ = writeln!(out, "{BLUE}Files with existing tags: {:>6}{RESET}", summary.existing_tags);
    let _ = writeln!(out, "{RED}Files that failed:        {:>6}{RESET}", summary.failed);

    for (path, reason) in &summary.failures {
        let _ = writeln!(out, "  {DIM}{}: {reason}{RESET}", path.display());
    }

    let started = summary
        .started_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| summary.started_at.to_string());
    let average = summary
        .average_per_file()
        .map_or_else(|| "n/a".to_string(), |d| format!("{:.2} seconds", d.as_secs_f64()));

    let _ = writeln!(out, "\n{CYAN}{BOLD}Performance Statistics:{RESET}");
    let _ = writeln!(out, "Run started at:           {started}");
    let _ = writeln!(
        out,
        "Total run time:           {:.2} seconds",
        summary.elapsed.as_secs_f64()
    );
    let _ = writeln!(out, "Average time per file:    {average}");
    let _ = writeln!(out, "Total API queries:        {}", summary.backend_calls);
    let _ = writeln!(out, "Total tokens used:        {}", summary.total_tokens);

    match summary.estimated_cost() {
        Some(cost) => {
            let _ = writeln!(out, "\n{YELLOW}Estimated API cost: ${cost:.2}{RESET}");
        }
        None => {
            let _ = writeln!(out, "\n{YELLOW}Using {} locally (no API costs){RESET}", summary.backend);
        }
    }

    out
}

/// Prints the summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    print!("{}", render_summary(summary));
}
