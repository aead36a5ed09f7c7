//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use docsift::source::{DirectorySource, PageSource};
use docsift::{build, Index, IndexOptions, Page, SearchConfig};

// Re-export canonical test utilities from docsift::testing
pub use docsift::testing::{
    make_header, make_locale_page, make_page, make_pages, with_frontmatter, with_headers,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// Page-data fixtures: a small two-locale docs site.
pub const FIXTURE_PAGES: &str = "data/fixtures/pages";

/// Config used with the fixtures (excludes "Draft" titles, indexes `tags`).
pub const FIXTURE_CONFIG: &str = "data/fixtures/docsift.json";

pub fn fixture_pages_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_PAGES)
}

pub fn fixture_config() -> SearchConfig {
    SearchConfig::from_file(&Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_CONFIG))
        .expect("fixture config should parse")
}

pub fn load_fixture_pages() -> Vec<Page> {
    DirectorySource::new(fixture_pages_dir())
        .load_pages()
        .expect("fixture pages should load")
}

/// The fixture site built with the fixture config.
pub fn fixture_index() -> Index {
    build(&load_fixture_pages(), &fixture_config().index_options())
        .expect("fixture site should build")
}

// ============================================================================
// SMALL SITES
// ============================================================================

/// Install + Config: the title-vs-header ranking scenario.
pub fn install_config_site() -> Vec<Page> {
    vec![
        with_headers(make_page("/config/", "Config", ""), &["Install Options"]),
        make_page("/install/", "Install", ""),
    ]
}

/// Build with every page searchable and no extra fields.
pub fn build_plain(pages: &[Page]) -> Index {
    build(pages, &IndexOptions::new()).expect("build should succeed")
}

/// Links of a search, in rank order.
pub fn links(index: &Index, locale: &str, query: &str, max: usize) -> Vec<String> {
    docsift::search(index, &docsift::LocaleKey::new(locale), query, max)
        .iter()
        .map(|result| result.link())
        .collect()
}
