//! Locale partitioning, idempotence and partition rebuilds.

use docsift::{build, build_locale, BuildError, IndexOptions, LocaleKey};

use super::common::{
    build_plain, fixture_config, fixture_index, load_fixture_pages, make_locale_page, make_page,
};

#[test]
fn test_fixture_site_has_two_partitions() {
    let index = fixture_index();
    let locales: Vec<_> = index.locales().cloned().collect();
    assert_eq!(locales, vec![LocaleKey::root(), LocaleKey::new("zh")]);
    assert_eq!(index.partition(&LocaleKey::new("zh")).unwrap().len(), 2);
}

#[test]
fn test_record_order_follows_input_order() {
    let index = fixture_index();
    let paths: Vec<_> = index
        .partition(&LocaleKey::root())
        .unwrap()
        .records
        .iter()
        .map(|r| r.path.as_str())
        .collect();
    assert_eq!(paths, vec!["/guide/config.html", "/guide/install.html"]);
}

#[test]
fn test_build_is_idempotent() {
    let pages = load_fixture_pages();
    let options = fixture_config().index_options();
    let first = build(&pages, &options).unwrap();
    let second = build(&pages, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_zero_pages_build_empty_index() {
    let index = build_plain(&[]);
    assert!(index.is_empty());
    assert_eq!(index.record_count(), 0);
}

#[test]
fn test_partition_rebuild_matches_full_build() {
    let pages = load_fixture_pages();
    let options = fixture_config().index_options();
    let full = build(&pages, &options).unwrap();

    let zh = LocaleKey::new("zh");
    let (partition, report) = build_locale(&pages, &zh, &options).unwrap();
    assert_eq!(Some(&partition), full.partition(&zh));
    assert_eq!(report.pages_seen, 2);
}

#[test]
fn test_duplicate_path_fails_only_when_in_same_locale() {
    let pages = vec![
        make_page("/guide/", "Guide", ""),
        make_locale_page("/zh/", "/guide/", "指南"),
    ];
    assert!(build(&pages, &IndexOptions::new()).is_ok());

    let duplicate = vec![make_page("/guide/", "Guide", ""), make_page("/guide/", "Guide 2", "")];
    match build(&duplicate, &IndexOptions::new()) {
        Err(BuildError::DuplicatePath { locale, path }) => {
            assert_eq!(locale, LocaleKey::root());
            assert_eq!(path, "/guide/");
        }
        other => panic!("expected duplicate path error, got {:?}", other),
    }

    // Rebuilding the other locale is unaffected.
    let mixed = vec![
        make_page("/guide/", "Guide", ""),
        make_page("/guide/", "Guide 2", ""),
        make_locale_page("/zh/", "/zh/guide/", "指南"),
    ];
    let (zh, _) = build_locale(&mixed, &LocaleKey::new("zh"), &IndexOptions::new()).unwrap();
    assert_eq!(zh.len(), 1);
}
