//! Reading and rewriting the single `Tags:` line of a note.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Tag, join_tags};

/// Marker that starts the tag line.
pub const TAG_LINE_MARKER: &str = "Tags:";

/// Matches the first `Tags:` line. The capture stops at the line break so a
/// replacement never touches anything after it.
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Tags:[ \t]*([^\r\n]*)").expect("tag line pattern is valid")
});

/// Extracts the tags from the first `Tags:` line of `content`.
///
/// The line's text is split on `#`; each non-empty piece becomes one tag.
/// Returns an empty vector when the note has no tag line.
///
/// # Examples
///
/// ```
/// use notetag::tagger::extract_tags;
///
/// let tags = extract_tags("# Title\nTags: #a #b #c\nbody");
/// let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
/// assert_eq!(names, ["#a", "#b", "#c"]);
/// ```
pub fn extract_tags(content: &str) -> Vec<Tag> {
    let Some(captures) = TAG_LINE.captures(content) else {
        return Vec::new();
    };

    captures[1].split('#').filter_map(Tag::parse).collect()
}

/// Writes `tags` into `content`.
///
/// An existing tag line is rewritten in place, keeping its position and line
/// ending. Otherwise a new tag line is appended after the last line.
pub fn replace_or_append(content: &str, tags: &[Tag]) -> String {
    let line = format!("{TAG_LINE_MARKER} {}", join_tags(tags));

    if let Some(found) = TAG_LINE.find(content) {
        let mut rewritten = String::with_capacity(content.len() + line.len());
        rewritten.push_str(&content[..found.start()]);
        rewritten.push_str(&line);
        rewritten.push_str(&content[found.end()..]);
        return rewritten;
    }

    let mut appended = String::with_capacity(content.len() + line.len() + 2);
    appended.push_str(content);
    if content.is_empty() || content.ends_with('\n') {
        appended.push_str(&line);
        if !content.is_empty() {
            appended.push('\n');
        }
    } else {
        appended.push('\n');
        appended.push_str(&line);
    }
    appended
}
