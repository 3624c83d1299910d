/// End-to-end tests of a tagging run over a scratch notes directory.
///
/// The backend is a mock so these run anywhere; see `backend_http.rs` for the
/// HTTP clients themselves.
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notetag::tagger::extract_tags;
use notetag::{
    BackendError, BackendKind, FileProcessor, OutcomeStatus, RunStatistics, RunSummary,
    Suggestion, Tag, TagBackend, TokenUsage, WalkError, tag_directory,
};
use tempfile::TempDir;

/// Always answers with the same tags and records what it was asked.
struct FixedBackend {
    tags: Vec<&'static str>,
    seen: Mutex<Vec<String>>,
}

impl FixedBackend {
    fn new(tags: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            tags,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl TagBackend for FixedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn suggest(&self, content: &str) -> Result<Suggestion, BackendError> {
        self.seen.lock().unwrap().push(content.to_string());
        Ok(Suggestion {
            tags: self.tags.iter().filter_map(|t| Tag::parse(t)).collect(),
            usage: TokenUsage::new(400, 100),
        })
    }
}

fn nine_new() -> Vec<&'static str> {
    vec!["#n1", "#n2", "#n3", "#n4", "#n5", "#n6", "#n7", "#n8", "#n9"]
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn note_with_nine_tags_is_left_byte_for_byte() {
    let vault = TempDir::new().unwrap();
    let content = "# Full\r\nTags: #a #b #c #d #e #f #g #h #i\r\n\r\ntext";
    write(vault.path(), "full.md", content);
    let backend = FixedBackend::new(nine_new());
    let mut stats = RunStatistics::start();

    let outcomes = tag_directory(
        vault.path(),
        &FileProcessor::new(backend.clone()),
        &mut stats,
    )
    .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status(), OutcomeStatus::ExistingTags);
    assert_eq!(read(vault.path(), "full.md"), content);
    assert!(backend.seen().is_empty());
}

#[test]
fn three_existing_tags_grow_to_ten() {
    let vault = TempDir::new().unwrap();
    write(
        vault.path(),
        "partial.md",
        "# Aqueducts\nTags: #rome #engineering #water\n\nNotes on Roman aqueducts.\n",
    );
    let backend = FixedBackend::new(nine_new());
    let mut stats = RunStatistics::start();

    let outcomes = tag_directory(
        vault.path(),
        &FileProcessor::new(backend.clone()),
        &mut stats,
    )
    .unwrap();

    let written = read(vault.path(), "partial.md");
    let tags = extract_tags(&written);
    let names: Vec<&str> = tags.iter().map(Tag::as_str).collect();

    assert_eq!(outcomes[0].status(), OutcomeStatus::TagsUpdated);
    assert_eq!(tags.len(), 10);
    assert_eq!(&names[..3], ["#rome", "#engineering", "#water"]);
    assert_eq!(&names[3..], ["#n1", "#n2", "#n3", "#n4", "#n5", "#n6", "#n7"]);
    assert!(written.ends_with("\n\nNotes on Roman aqueducts.\n"));
    assert_eq!(backend.seen().len(), 1);
    assert!(backend.seen()[0].contains("Roman aqueducts"));
}

#[test]
fn oversized_answers_fail_the_note_and_leave_it_alone() {
    let vault = TempDir::new().unwrap();
    let content = "Untagged note\n";
    write(vault.path(), "note.md", content);
    let backend = FixedBackend::new(vec![
        "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9", "t10", "t11", "t12", "t13", "t14",
        "t15",
    ]);
    let mut stats = RunStatistics::start();

    let outcomes = tag_directory(
        vault.path(),
        &FileProcessor::new(backend.clone()),
        &mut stats,
    )
    .unwrap();

    assert_eq!(outcomes[0].status(), OutcomeStatus::Failed);
    assert_eq!(read(vault.path(), "note.md"), content);
    assert_eq!(backend.seen().len(), 3);
    assert_eq!(stats.backend_calls(), 3);
}

#[test]
fn excluded_directories_are_never_processed() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), ".git/COMMIT.md", "git internals");
    write(vault.path(), ".obsidian/cache.md", "editor state");
    write(vault.path(), "zTemplates/daily.md", "template");
    write(vault.path(), "journal/today.md", "Wrote some Rust");
    let backend = FixedBackend::new(vec!["#rust"]);
    let mut stats = RunStatistics::start();

    let outcomes = tag_directory(
        vault.path(),
        &FileProcessor::new(backend.clone()),
        &mut stats,
    )
    .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].path().ends_with("journal/today.md"));
    assert_eq!(backend.seen(), ["Wrote some Rust"]);
    assert_eq!(read(vault.path(), "zTemplates/daily.md"), "template");
    assert_eq!(read(vault.path(), ".git/COMMIT.md"), "git internals");
}

#[test]
fn summary_reflects_the_run() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "a.md", "alpha\n");
    write(vault.path(), "b.md", "beta\nTags: #a #b #c #d #e #f #g #h #i #j\n");
    write(vault.path(), "c.txt", "not a note");
    let backend = FixedBackend::new(vec!["#x"]);
    let mut stats = RunStatistics::start();

    let outcomes = tag_directory(
        vault.path(),
        &FileProcessor::new(backend.clone()),
        &mut stats,
    )
    .unwrap();
    let summary = RunSummary::with_elapsed(
        &outcomes,
        &stats,
        backend.kind(),
        Duration::from_secs(4),
    );

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.tags_updated, 1);
    assert_eq!(summary.existing_tags, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.backend_calls, 1);
    assert_eq!(summary.total_tokens, 500);
    assert_eq!(summary.average_per_file(), Some(Duration::from_secs(2)));
    assert!((summary.estimated_cost().unwrap() - 0.04).abs() < 1e-9);
}

#[test]
fn empty_directory_summarizes_without_dividing_by_zero() {
    let vault = TempDir::new().unwrap();
    let backend = FixedBackend::new(vec![]);
    let mut stats = RunStatistics::start();

    let outcomes =
        tag_directory(vault.path(), &FileProcessor::new(backend), &mut stats).unwrap();
    let summary = RunSummary::compute(&outcomes, &stats, BackendKind::Local);

    assert!(outcomes.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.average_per_file(), None);
}

#[test]
fn missing_root_is_fatal() {
    let vault = TempDir::new().unwrap();
    let missing = vault.path().join("gone");
    let backend = FixedBackend::new(vec![]);
    let mut stats = RunStatistics::start();

    let result = tag_directory(&missing, &FileProcessor::new(backend), &mut stats);

    assert!(matches!(result, Err(WalkError::DirectoryNotFound(_))));
}

#[test]
fn second_run_skips_notes_the_first_run_filled() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "note.md", "Body\nTags: #a\n");
    let backend = FixedBackend::new(nine_new());
    let processor = FileProcessor::new(backend.clone());

    let mut first = RunStatistics::start();
    tag_directory(vault.path(), &processor, &mut first).unwrap();
    let after_first = read(vault.path(), "note.md");

    let mut second = RunStatistics::start();
    let outcomes = tag_directory(vault.path(), &processor, &mut second).unwrap();

    assert_eq!(outcomes[0].status(), OutcomeStatus::ExistingTags);
    assert_eq!(read(vault.path(), "note.md"), after_first);
    assert_eq!(second.backend_calls(), 0);
}
