//! Comment stripping and whitespace normalization.
//!
//! Both helpers are deterministic and usable on their own for callers that need
//! a partially normalized view of a file without running the full pipeline.
//!
//! ```rust
//! use canonical::{collapse_whitespace, strip_comments};
//!
//! let text = "x = 1  # set x\n\n\ty = x\n";
//! assert_eq!(collapse_whitespace(&strip_comments(text, "#")), "x = 1 y = x");
//! ```

/// Removes line comments: on every line, the substring from the first
/// occurrence of `marker` to the end of the line is dropped. Lines are then
/// joined with single spaces.
///
/// The marker is matched literally, so a marker inside a string literal also
/// starts a comment.
pub fn strip_comments(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.lines().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let code = match line.find(marker) {
            Some(pos) if !marker.is_empty() => &line[..pos],
            _ => line,
        };
        out.push_str(code);
    }
    out
}

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// All Unicode whitespace counts as a delimiter. Returns an empty string for
/// empty or whitespace-only input.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
