// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Field extraction: one page in, one `SearchableRecord` out.
//!
//! Pure and deterministic. The header tree is flattened pre-order so document
//! order survives, and the body is cut into excerpt-sized blocks up front. Storing
//! blocks instead of the whole body means a body match already *is* its excerpt;
//! the runtime never re-scans a page to show context.

use tracing::warn;

use super::options::ExtraFieldsFn;
use super::{Page, PageHeader};
use crate::error::ExtractionFieldError;
use crate::types::{Header, SearchableRecord};
use crate::utils::collapse_whitespace;

/// Upper bound on characters stored per body excerpt.
pub const EXCERPT_MAX_CHARS: usize = 160;

/// A record plus the extra-fields failure, if there was one.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub record: SearchableRecord,
    pub diagnostic: Option<ExtractionFieldError>,
}

/// Extract the searchable fields of `page`.
///
/// A failing `get_extra_fields` does not fail extraction: the record gets no
/// extra fields and the failure comes back as a diagnostic.
pub fn extract(page: &Page, get_extra_fields: &ExtraFieldsFn) -> Extraction {
    let mut headers = Vec::new();
    flatten_headers(&page.headers, &mut headers);

    let (extra_fields, diagnostic) = match get_extra_fields(page) {
        Ok(fields) => (fields, None),
        Err(source) => {
            warn!(path = %page.path, error = %source, "extra fields failed; indexing page without them");
            (
                Vec::new(),
                Some(ExtractionFieldError {
                    path: page.path.clone(),
                    source,
                }),
            )
        }
    };

    Extraction {
        record: SearchableRecord {
            path: page.path.clone(),
            locale: page.locale_key(),
            title: page.title.trim().to_string(),
            headers,
            excerpts: segment_body(&page.content),
            extra_fields,
        },
        diagnostic,
    }
}

/// Pre-order walk: a header, then its children, then its next sibling.
fn flatten_headers(headers: &[PageHeader], out: &mut Vec<Header>) {
    for header in headers {
        let text = collapse_whitespace(&header.text);
        if !text.is_empty() {
            out.push(Header {
                text,
                depth: header.depth.max(1),
                anchor: header.anchor.clone(),
            });
        }
        flatten_headers(&header.children, out);
    }
}

/// Split body text into excerpt blocks.
///
/// Blank lines separate blocks. Inside a block, whitespace is collapsed and the
/// text is cut at word boundaries so no excerpt exceeds `EXCERPT_MAX_CHARS`. A
/// single word longer than the limit is hard-split.
pub fn segment_body(content: &str) -> Vec<String> {
    let mut excerpts = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            push_paragraph(&paragraph, &mut excerpts);
            paragraph.clear();
        } else {
            paragraph.push(line);
        }
    }
    push_paragraph(&paragraph, &mut excerpts);

    excerpts
}

fn push_paragraph(lines: &[&str], excerpts: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in lines.iter().flat_map(|line| line.split_whitespace()) {
        let word_chars = word.chars().count();

        if word_chars > EXCERPT_MAX_CHARS {
            if !current.is_empty() {
                excerpts.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(EXCERPT_MAX_CHARS) {
                excerpts.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };
        if needed > EXCERPT_MAX_CHARS {
            excerpts.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        excerpts.push(current);
    }
}
