use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use notetag::{
    BackendKind, Config, ConfigError, FileProcessor, Overrides, RunStatistics, RunSummary,
    WalkError, print_summary, tag_directory,
};
use tracing_subscriber::EnvFilter;

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// notetag - fill in missing tags on markdown notes using a language model
#[derive(Parser)]
#[command(name = "notetag")]
#[command(about = "Adds model-suggested tags to markdown notes that have fewer than 9")]
#[command(version)]
struct Cli {
    /// Root directory of the notes (defaults to OBSIDIAN_DIRECTORY)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Use a local Ollama model
    #[arg(long, conflicts_with = "remote")]
    local: bool,

    /// Use the Claude API
    #[arg(long)]
    remote: bool,

    /// Model name for the selected backend
    #[arg(long, value_name = "NAME")]
    model: Option<String>,

    /// Compute tags without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let backend = if self.local {
            Some(BackendKind::Local)
        } else if self.remote {
            Some(BackendKind::Remote)
        } else {
            None
        };

        Overrides {
            notes_dir: self.dir.clone(),
            backend,
            model: self.model.clone(),
            dry_run: self.dry_run,
        }
    }
}

fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("{RED}Error: {e:#}{RESET}");
        std::process::exit(exit_code);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "notetag=debug" } else { "notetag=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// Missing configuration and a missing notes directory are the user's to fix.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<ConfigError>().is_some() || error.downcast_ref::<WalkError>().is_some()
}

fn run(cli: &Cli) -> Result<()> {
    let mut stats = RunStatistics::start();

    let config = Config::from_env(cli.overrides())?;
    let backend = config
        .build_backend()
        .context("Failed to create backend client")?;

    println!("{GREEN}Starting note tagger{RESET}");
    println!(
        "{CYAN}Using {} ({}) for tag generation{RESET}",
        backend.kind(),
        config.backend.model()
    );

    let processor = FileProcessor::new(backend.clone()).dry_run(config.dry_run);
    let outcomes = tag_directory(&config.notes_dir, &processor, &mut stats)?;

    let summary = RunSummary::compute(&outcomes, &stats, backend.kind());
    print_summary(&summary);
    println!("\n{GREEN}Note tagger completed.{RESET}");

    Ok(())
}
