//! Tag handling for notes: reading the `Tags:` line and merging suggestions.
//!
//! A note carries at most one structured convention, a line of the form
//!
//! ```text
//! Tags: #rust #async #tokio
//! ```
//!
//! [`extract_tags`] reads it, [`merge_tags`] combines it with backend
//! suggestions, and [`replace_or_append`] writes the result back.

mod merger;
mod parser;

pub use merger::{MAX_TAGS, merge_tags};
pub use parser::{TAG_LINE_MARKER, extract_tags, replace_or_append};
