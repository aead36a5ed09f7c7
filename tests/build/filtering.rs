//! Searchable rules from the fixture configuration.

use docsift::{build_with_report, search, LocaleKey};

use super::common::{fixture_config, fixture_index, load_fixture_pages};

#[test]
fn test_draft_titles_are_excluded() {
    let index = fixture_index();
    let root = index.partition(&LocaleKey::root()).unwrap();
    assert!(root.get("/guide/plugins.html").is_none());

    // "plugin" only appears on the draft page.
    assert!(search(&index, &LocaleKey::root(), "plugin", 5).is_empty());
}

#[test]
fn test_frontmatter_search_false_is_excluded() {
    let index = fixture_index();
    let root = index.partition(&LocaleKey::root()).unwrap();
    assert!(root.get("/changelog.html").is_none());
    assert!(search(&index, &LocaleKey::root(), "changelog", 5).is_empty());
}

#[test]
fn test_report_counts_exclusions() {
    let pages = load_fixture_pages();
    let (_, report) = build_with_report(&pages, &fixture_config().index_options()).unwrap();
    assert_eq!(report.pages_seen, 6);
    assert_eq!(report.excluded, 2);
    assert_eq!(report.records, 4);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_configured_extra_fields_are_indexed() {
    let index = fixture_index();
    let install = index
        .partition(&LocaleKey::root())
        .unwrap()
        .get("/guide/install.html")
        .unwrap();
    assert_eq!(install.extra_fields, vec!["setup", "getting started"]);

    let results = search(&index, &LocaleKey::root(), "configuration", 5);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].record.path, "/guide/config.html");
}
