//! Field extraction on realistic pages.

use docsift::build::{extract, IndexOptions, EXCERPT_MAX_CHARS};
use docsift::{ExtraFieldsError, Page};
use serde_json::json;

use super::common::{load_fixture_pages, make_page, with_frontmatter};

fn fixture(path: &str) -> Page {
    load_fixture_pages()
        .into_iter()
        .find(|p| p.path == path)
        .unwrap()
}

#[test]
fn test_nested_headers_flatten_in_document_order() {
    let page = fixture("/guide/install.html");
    let record = extract(&page, IndexOptions::new().extra_fields()).record;

    let headers: Vec<_> = record
        .headers
        .iter()
        .map(|h| (h.text.as_str(), h.depth, h.anchor.as_str()))
        .collect();
    assert_eq!(
        headers,
        vec![
            ("Prerequisites", 2, "prerequisites"),
            ("Install from source", 2, "install-from-source"),
            ("Build flags", 3, "build-flags"),
        ]
    );
}

#[test]
fn test_body_is_split_into_blocks() {
    let page = fixture("/guide/install.html");
    let record = extract(&page, IndexOptions::new().extra_fields()).record;
    assert_eq!(
        record.excerpts,
        vec![
            "Download the release archive for your platform.",
            "Run the installer and follow the prompts. The installer checks your toolchain first.",
        ]
    );
}

#[test]
fn test_long_body_respects_excerpt_limit() {
    let body = "lorem ipsum dolor sit amet ".repeat(40);
    let page = make_page("/long/", "Long", &body);
    let record = extract(&page, IndexOptions::new().extra_fields()).record;

    assert!(record.excerpts.len() > 1);
    for excerpt in &record.excerpts {
        assert!(excerpt.chars().count() <= EXCERPT_MAX_CHARS);
        assert!(!excerpt.starts_with(' ') && !excerpt.ends_with(' '));
    }
    assert_eq!(record.excerpts.join(" "), body.trim());
}

#[test]
fn test_extra_fields_keep_callback_order() {
    let page = with_frontmatter(make_page("/a/", "A", ""), "tags", json!(["b", "a"]));
    let options = IndexOptions::new().with_extra_fields(|page: &Page| {
        let mut fields = vec!["first".to_string()];
        if let Some(tags) = page.frontmatter.get("tags").and_then(|t| t.as_array()) {
            fields.extend(tags.iter().filter_map(|t| t.as_str()).map(String::from));
        }
        Ok(fields)
    });
    let record = extract(&page, options.extra_fields()).record;
    assert_eq!(record.extra_fields, vec!["first", "b", "a"]);
}

#[test]
fn test_extra_field_failure_becomes_diagnostic() {
    let page = make_page("/a/", "A", "body");
    let options = IndexOptions::new()
        .with_extra_fields(|_: &Page| Err(ExtraFieldsError::new("frontmatter missing")));
    let extraction = extract(&page, options.extra_fields());

    assert!(extraction.record.extra_fields.is_empty());
    assert_eq!(extraction.record.excerpts, vec!["body"]);
    let diagnostic = extraction.diagnostic.unwrap();
    assert_eq!(diagnostic.path, "/a/");
}
