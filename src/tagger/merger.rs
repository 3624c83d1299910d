use std::collections::HashSet;

use crate::models::Tag;

/// Maximum number of tags a note may carry after a merge.
pub const MAX_TAGS: usize = 10;

/// Merges suggested tags into a note's existing tags.
///
/// Existing tags keep their order and come first; suggestions that are not
/// already present follow in the order the backend returned them. Duplicates
/// are dropped on their second occurrence and the result is capped at
/// [`MAX_TAGS`].
///
/// # Examples
///
/// ```
/// use notetag::Tag;
/// use notetag::tagger::merge_tags;
///
/// let parse = |raw: &[&str]| raw.iter().filter_map(|t| Tag::parse(t)).collect::<Vec<_>>();
///
/// let merged = merge_tags(&parse(&["#a", "#b"]), &parse(&["b", "#c"]));
/// assert_eq!(merged, parse(&["#a", "#b", "#c"]));
/// ```
pub fn merge_tags(existing: &[Tag], suggested: &[Tag]) -> Vec<Tag> {
    let mut seen = HashSet::new();
    existing
        .iter()
        .chain(suggested)
        .filter(|&tag| seen.insert(tag.as_str()))
        .take(MAX_TAGS)
        .cloned()
        .collect()
}
