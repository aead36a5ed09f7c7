//! Loading page data from a directory.

use std::fs;

use docsift::source::{DirectorySource, PageSource};
use docsift::{LocaleKey, SourceError};

use super::common::{fixture_pages_dir, load_fixture_pages};

#[test]
fn test_fixture_pages_load_in_path_order() {
    let pages = load_fixture_pages();
    let paths: Vec<_> = pages.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/changelog.html",
            "/guide/config.html",
            "/guide/plugins.html",
            "/guide/install.html",
            "/zh/guide/config.html",
            "/zh/guide/install.html",
        ]
    );
}

#[test]
fn test_generator_aliases_are_accepted() {
    let pages = load_fixture_pages();
    let zh_install = pages
        .iter()
        .find(|p| p.path == "/zh/guide/install.html")
        .unwrap();
    assert_eq!(zh_install.locale_key(), LocaleKey::new("zh"));
    assert_eq!(zh_install.headers[0].text, "从源码安装");
    assert_eq!(zh_install.headers[0].anchor, "install-from-source");
}

#[test]
fn test_known_locales_after_load() {
    let source = DirectorySource::new(fixture_pages_dir());
    assert!(source.known_locales().is_empty());
    source.load_pages().unwrap();
    let locales: Vec<_> = source.known_locales().into_iter().collect();
    assert_eq!(locales, vec![LocaleKey::root(), LocaleKey::new("zh")]);
}

#[test]
fn test_malformed_page_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ok.json"), r#"{"path": "/ok/"}"#).unwrap();
    fs::write(dir.path().join("broken.json"), r#"{"title": "no path"}"#).unwrap();

    match DirectorySource::new(dir.path()).load_pages() {
        Err(SourceError::Parse { path, .. }) => assert!(path.ends_with("broken.json")),
        other => panic!("expected parse error, got {:?}", other.map(|p| p.len())),
    }
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path().join("does-not-exist"));
    assert!(source.load_pages().is_err());
}
