use std::fmt;

/// A `#`-prefixed classification token attached to a note.
///
/// A `Tag` is always held in canonical form: exactly one leading `#`, no
/// embedded `#`, and no surrounding whitespace. Equality and hashing operate
/// on that canonical form, so `"rust"`, `"#rust"` and `"  ##rust "` all parse
/// to the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Parses raw text into a canonical tag.
    ///
    /// Returns `None` when nothing remains after stripping `#` and whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::Tag;
    ///
    /// assert_eq!(Tag::parse("rust").unwrap().as_str(), "#rust");
    /// assert_eq!(Tag::parse("  ##rust ").unwrap().as_str(), "#rust");
    /// assert_eq!(Tag::parse("#web#dev").unwrap().as_str(), "#webdev");
    /// assert!(Tag::parse(" # ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let body: String = raw
            .trim()
            .trim_start_matches('#')
            .chars()
            .filter(|c| *c != '#')
            .collect();
        let body = body.trim();

        if body.is_empty() {
            None
        } else {
            Some(Self(format!("#{body}")))
        }
    }

    /// Returns the canonical form, including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Joins tags into the space-separated form used on a `Tags:` line.
pub fn join_tags(tags: &[Tag]) -> String {
    tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(" ")
}
