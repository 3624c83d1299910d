use std::time::{Duration, Instant};

use time::OffsetDateTime;

use crate::backend::TokenUsage;

/// Run-wide accumulators for backend usage.
///
/// Owned by the driver of a run and passed by `&mut` to whoever issues backend
/// calls. Nothing here outlives the process.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    started_at: OffsetDateTime,
    started: Instant,
    backend_calls: u64,
    total_tokens: u64,
}

impl RunStatistics {
    /// Starts the clock for a new run.
    pub fn start() -> Self {
        Self {
            started_at: OffsetDateTime::now_utc(),
            started: Instant::now(),
            backend_calls: 0,
            total_tokens: 0,
        }
    }

    /// Counts one backend request, whether or not it succeeded.
    pub fn record_call(&mut self) {
        self.backend_calls += 1;
    }

    /// Adds the usage reported by a successful backend call.
    pub fn record_usage(&mut self, usage: TokenUsage) {
        self.total_tokens += usage.total();
    }

    pub fn backend_calls(&self) -> u64 {
        self.backend_calls
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Wall-clock timestamp at which the run started.
    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    /// Time elapsed since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
