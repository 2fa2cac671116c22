//! # Text Layout Helpers
//!
//! Plain-string primitives used by the layout engine. Nothing in here knows
//! about pixels or fonts: wrapping is purely token-count based, and label
//! extraction is a single split on the first colon.

/// Wrap `text` into lines of at most `words_per_line` whitespace-separated tokens.
///
/// Tokens inside a line are joined with a single space and lines are joined
/// with `\n`. Input without any tokens yields a single empty line (the empty
/// string). A width of zero is treated as one word per line.
///
/// # Example
/// ```
/// use dashboard_lib::text::wrap_by_word_count;
///
/// let wrapped = wrap_by_word_count("one two   three four five", 2);
/// assert_eq!(wrapped, "one two\nthree four\nfive");
/// ```
pub fn wrap_by_word_count(text: &str, words_per_line: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_line.max(1))
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split an optional `label:` prefix off `text`.
///
/// Only the first colon is significant; the remainder is returned verbatim,
/// including any leading whitespace and further colons.
///
/// ```
/// use dashboard_lib::text::split_label;
///
/// assert_eq!(split_label("Work: standup"), (Some("Work"), " standup"));
/// assert_eq!(split_label("No colon here"), (None, "No colon here"));
/// ```
pub fn split_label(text: &str) -> (Option<&str>, &str) {
    match text.split_once(':') {
        Some((label, rest)) => (Some(label), rest),
        None => (None, text),
    }
}
