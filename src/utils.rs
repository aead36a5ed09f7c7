//! Utility functions for string processing.

use crate::types::TextSpan;

/// Normalize a user query: trim surrounding whitespace, then case-fold.
///
/// Returns an empty string for whitespace-only input, which callers treat as
/// "no query" rather than "match everything".
pub fn normalize_query(query: &str) -> String {
    fold_case(query.trim())
}

/// Per-character lowercase.
///
/// Deliberately char-by-char rather than `str::to_lowercase`, which special-cases
/// a final sigma. Queries and field text must fold identically or substring
/// containment stops being symmetric.
pub fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find `needle` (already folded) in `haystack`, returning the match as character
/// offsets into the *original* haystack.
///
/// Folding can change length (`'İ'` lowercases to two chars), so offsets found in
/// the folded text are mapped back through the char each folded char came from.
pub fn find_folded(haystack: &str, needle: &str) -> Option<TextSpan> {
    if needle.is_empty() {
        return None;
    }

    let mut folded = String::with_capacity(haystack.len());
    let mut origin: Vec<usize> = Vec::with_capacity(haystack.len());
    for (char_idx, c) in haystack.chars().enumerate() {
        for lower in c.to_lowercase() {
            folded.push(lower);
            origin.push(char_idx);
        }
    }

    let byte_start = folded.find(needle)?;
    let folded_start = folded[..byte_start].chars().count();
    let folded_end = folded_start + needle.chars().count();

    let start = origin[folded_start];
    let end = origin[folded_end - 1] + 1;
    Some(TextSpan { start, end })
}

/// Slice `text` by character offsets.
pub fn char_slice(text: &str, span: TextSpan) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let start = indices.nth(span.start).unwrap_or(text.len());
    let end = if span.end > span.start {
        indices.nth(span.end - span.start - 1).unwrap_or(text.len())
    } else {
        start
    };
    &text[start..end]
}
