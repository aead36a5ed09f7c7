use serde::{Deserialize, Serialize};

use crate::types::{FieldKind, MatchResult, TextSpan};
use crate::utils::char_slice;

/// A match projected into what the suggestion list renders.
///
/// Owned, so it can outlive the query (the interaction controller keeps the
/// current list around between keystrokes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Page title.
    pub title: String,
    /// Text of the matched field.
    pub excerpt: String,
    /// Page path, with `#anchor` for header matches.
    pub link: String,
    pub kind: FieldKind,
    /// Matched span within `excerpt`, in characters.
    pub highlight: TextSpan,
}

impl Suggestion {
    /// The highlighted part of `excerpt`.
    pub fn highlighted(&self) -> &str {
        char_slice(&self.excerpt, self.highlight)
    }

    /// `excerpt` split into (before, match, after).
    pub fn split_highlight(&self) -> (&str, &str, &str) {
        let start = byte_offset(&self.excerpt, self.highlight.start);
        let end = byte_offset(&self.excerpt, self.highlight.end);
        (
            &self.excerpt[..start],
            &self.excerpt[start..end],
            &self.excerpt[end..],
        )
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

impl From<&MatchResult<'_>> for Suggestion {
    fn from(result: &MatchResult<'_>) -> Self {
        Suggestion {
            title: result.record.title.clone(),
            excerpt: result.text().to_string(),
            link: result.link(),
            kind: result.kind,
            highlight: result.span,
        }
    }
}

impl From<MatchResult<'_>> for Suggestion {
    fn from(result: MatchResult<'_>) -> Self {
        Suggestion::from(&result)
    }
}
