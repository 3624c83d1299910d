//! Prompt text shared by both backends.

/// Number of tags the backends are asked for.
pub const REQUESTED_TAGS: usize = 9;

/// Instructions given to every backend.
///
/// The remote backend receives this as its system prompt; the local backend
/// gets it inlined ahead of the note content.
pub const INSTRUCTIONS: &str = r#"You generate tags for a personal markdown note. Analyse the note and return exactly 9 distinct tags that together classify its key topics.

RULES:
1. Read the whole note and identify its main topics, themes and key concepts
2. Cover different aspects of the note instead of repeating a single theme
3. Each tag is a single word or a short phrase without spaces
4. Prefix every tag with '#'
5. Separate tags with a single space
6. Use your background and world knowledge freely; tags do not have to appear literally in the text
7. Never tag the note-taking software or file format itself (no #Obsidian, #Markdown, #Content, #Note)
8. Output nothing except the 9 tags: no explanations, numbering or formatting

OUTPUT FORMAT:
#tag1 #tag2 #tag3 #tag4 #tag5 #tag6 #tag7 #tag8 #tag9"#;

/// Builds the single prompt sent to the local backend.
pub fn local_prompt(content: &str) -> String {
    format!(
        "{INSTRUCTIONS}\n\nNOTE CONTENT:\n<content>\n{content}\n</content>\n\nReply with only the {REQUESTED_TAGS} tags:"
    )
}
