//! Discovery of note files under a root directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::{DirEntry, FilterEntry, WalkDir};

/// Extension of note files, without the dot.
pub const NOTE_EXTENSION: &str = "md";

/// Directory names that are never descended into.
///
/// Any directory whose name starts with `.` is skipped as well.
pub const EXCLUDED_DIRS: &[&str] = &[
    "zTemplates",
    "cheat-sheets-main",
    "zz_Attachments",
    "00 Monthly Tasks",
    "BMO",
    "zz_Archive",
];

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

/// Lazy iterator over the note files below a root directory.
///
/// Excluded directories are pruned before they are opened, so nothing inside
/// them is ever visited. Entries are yielded in file-name order within each
/// directory. Symlinked directories are not descended into; a symlink that
/// resolves to a file is yielded like any other note.
pub struct NoteWalker {
    inner: FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

impl NoteWalker {
    /// Starts a walk at `root`.
    ///
    /// # Errors
    ///
    /// Returns `WalkError::DirectoryNotFound` if `root` does not exist or is
    /// not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, WalkError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(WalkError::DirectoryNotFound(root.to_path_buf()));
        }

        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_visitable as fn(&DirEntry) -> bool);

        Ok(Self { inner })
    }
}

impl Iterator for NoteWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) if is_file_like(&entry) && is_note(entry.path()) => {
                    return Some(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Skipping unreadable entry"),
            }
        }
    }
}

/// Returns whether `name` is a directory that must not be descended into.
pub fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

fn is_visitable(entry: &DirEntry) -> bool {
    // The root is always walked, whatever its name.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    !is_excluded_dir(&entry.file_name().to_string_lossy())
}

fn is_file_like(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn is_note(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
}
