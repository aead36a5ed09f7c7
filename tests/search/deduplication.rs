//! At most one result per (record, field kind).

use std::collections::HashSet;

use docsift::{search, FieldKind, LocaleKey};

use super::common::{build_plain, make_page, with_headers};

#[test]
fn test_one_header_result_per_page() {
    let page = with_headers(
        make_page("/api/", "API", ""),
        &["Client options", "Server options", "Options reference"],
    );
    let index = build_plain(&[page]);
    let results = search(&index, &LocaleKey::root(), "options", 10);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, FieldKind::Header);
    // "Options reference" matches at offset 0, earlier than the others.
    assert_eq!(results[0].link(), "/api/#options-reference");
}

#[test]
fn test_equal_offsets_prefer_first_field() {
    let page = with_headers(make_page("/api/", "API", ""), &["Limits", "Limits (advanced)"]);
    let index = build_plain(&[page]);
    let results = search(&index, &LocaleKey::root(), "limits", 10);
    assert_eq!(results[0].link(), "/api/#limits");
}

#[test]
fn test_one_body_result_per_page() {
    let body = "Tokens expire.\n\nRefresh tokens rotate.\n\nRevoke tokens on logout.";
    let index = build_plain(&[make_page("/auth/", "Auth", body)]);
    let results = search(&index, &LocaleKey::root(), "tokens", 10);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].text(), "Tokens expire.");
}

#[test]
fn test_no_duplicate_kind_per_record_on_fixture() {
    let index = super::common::fixture_index();
    for query in ["install", "config", "o", "e", "安装"] {
        for locale in ["/", "/zh/"] {
            let results = search(&index, &LocaleKey::new(locale), query, 50);
            let mut seen = HashSet::new();
            for result in &results {
                assert!(
                    seen.insert((result.record.path.as_str(), result.kind)),
                    "duplicate {:?} result for {} on {:?}",
                    result.kind,
                    result.record.path,
                    query
                );
            }
        }
    }
}
