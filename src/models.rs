mod outcome;
mod run_statistics;
mod tag;

pub use outcome::{OutcomeStatus, ProcessingOutcome};
pub use run_statistics::RunStatistics;
pub use tag::{Tag, join_tags};
