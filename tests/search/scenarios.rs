//! End-user scenarios on the fixture site and on generated sites.

use docsift::{search, FieldKind, LocaleKey, Suggestion};

use super::common::{build_plain, fixture_index, links, make_page, make_pages};

#[test]
fn test_install_query_on_fixture_site() {
    let index = fixture_index();
    assert_eq!(
        links(&index, "/", "install", 5),
        vec![
            "/guide/install.html",
            "/guide/config.html#install-options",
            "/guide/install.html#install-from-source",
            "/guide/install.html",
        ]
    );
}

#[test]
fn test_body_suggestion_highlights_match() {
    let index = fixture_index();
    let results = search(&index, &LocaleKey::root(), "installer", 5);
    assert_eq!(results.len(), 1);

    let suggestion = Suggestion::from(&results[0]);
    assert_eq!(suggestion.kind, FieldKind::Body);
    assert_eq!(suggestion.title, "Install");
    assert_eq!(suggestion.highlighted(), "installer");
    assert_eq!(suggestion.highlight.start, 8);
}

#[test]
fn test_locales_are_searched_independently() {
    let index = fixture_index();
    assert!(links(&index, "/", "安装", 5).is_empty());
    assert_eq!(
        links(&index, "/zh/", "安装", 5),
        vec![
            "/zh/guide/install.html",
            "/zh/guide/config.html#install-options",
            "/zh/guide/install.html#install-from-source",
        ]
    );
}

#[test]
fn test_unknown_locale_has_no_results() {
    let index = fixture_index();
    assert!(links(&index, "/fr/", "install", 5).is_empty());
}

#[test]
fn test_results_truncate_to_max_suggestions() {
    let index = build_plain(&make_pages("Guide", 100));
    let results = search(&index, &LocaleKey::root(), "guide", 5);

    assert_eq!(results.len(), 5);
    let paths: Vec<_> = results.iter().map(|r| r.record.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/guide-0/", "/guide-1/", "/guide-2/", "/guide-3/", "/guide-4/"]
    );
}

#[test]
fn test_empty_and_whitespace_queries_match_nothing() {
    let index = fixture_index();
    assert!(links(&index, "/", "", 5).is_empty());
    assert!(links(&index, "/", "   \t", 5).is_empty());
}

#[test]
fn test_query_is_trimmed() {
    let index = fixture_index();
    assert_eq!(
        links(&index, "/", "  install  ", 5),
        links(&index, "/", "install", 5)
    );
}

#[test]
fn test_zero_max_suggestions_returns_nothing() {
    let index = build_plain(&[make_page("/a/", "Alpha", "")]);
    assert!(search(&index, &LocaleKey::root(), "alpha", 0).is_empty());
}

#[test]
fn test_no_match_returns_empty() {
    let index = fixture_index();
    assert!(links(&index, "/", "kubernetes", 5).is_empty());
}
