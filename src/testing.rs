// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! Always compiled but hidden from documentation, so integration tests and
//! benches build pages the same way.

#![doc(hidden)]

use serde_json::{Map, Value};

use crate::build::{Page, PageHeader};

/// A page in the default locale with a title and body.
pub fn make_page(path: &str, title: &str, content: &str) -> Page {
    Page {
        path: path.to_string(),
        locale: None,
        title: title.to_string(),
        headers: Vec::new(),
        content: content.to_string(),
        frontmatter: Map::new(),
    }
}

/// A page in `locale`.
pub fn make_locale_page(locale: &str, path: &str, title: &str) -> Page {
    Page {
        locale: Some(locale.to_string()),
        ..make_page(path, title, "")
    }
}

/// A level-2 header whose anchor is the slugged text.
pub fn make_header(text: &str) -> PageHeader {
    PageHeader {
        text: text.to_string(),
        depth: 2,
        anchor: slugify(text),
        children: Vec::new(),
    }
}

/// Page with headers (all level 2).
pub fn with_headers(mut page: Page, headers: &[&str]) -> Page {
    page.headers = headers.iter().map(|text| make_header(text)).collect();
    page
}

/// Page with one frontmatter entry added.
pub fn with_frontmatter(mut page: Page, key: &str, value: Value) -> Page {
    page.frontmatter.insert(key.to_string(), value);
    page
}

/// `n` pages titled `"{prefix} {i}"` at `/{prefix}-{i}/`, lowercase paths.
pub fn make_pages(prefix: &str, n: usize) -> Vec<Page> {
    (0..n)
        .map(|i| {
            let title = format!("{} {}", prefix, i);
            let path = format!("/{}-{}/", prefix.to_lowercase(), i);
            make_page(&path, &title, &format!("Body text of {}.", title))
        })
        .collect()
}

fn slugify(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
