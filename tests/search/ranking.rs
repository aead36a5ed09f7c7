//! Rank order: field priority, then match offset, then record order.

use docsift::{search, FieldKind, LocaleKey};

use super::common::{
    build_plain, install_config_site, links, make_page, with_frontmatter, with_headers,
};

#[test]
fn test_title_match_beats_header_match() {
    let index = build_plain(&install_config_site());
    let results = search(&index, &LocaleKey::root(), "install", 5);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].kind, FieldKind::Title);
    assert_eq!(results[0].record.title, "Install");
    assert_eq!(results[1].kind, FieldKind::Header);
    assert_eq!(results[1].link(), "/config/#install-options");
}

#[test]
fn test_title_beats_body_regardless_of_order() {
    let pages = vec![
        make_page("/a/", "Overview", "Theming is covered elsewhere."),
        make_page("/b/", "Theming", ""),
    ];
    let index = build_plain(&pages);
    assert_eq!(links(&index, "/", "theming", 5), vec!["/b/", "/a/"]);
}

#[test]
fn test_all_four_kinds_rank_in_priority_order() {
    let page = with_frontmatter(
        with_headers(make_page("/d/", "Deploy", "How to deploy."), &["Deploy targets"]),
        "tags",
        serde_json::json!("deployment"),
    );
    let options = docsift::IndexOptions::new()
        .with_extra_fields(|page| docsift::config::frontmatter_fields(page, &["tags".to_string()]));
    let index = docsift::build(&[page], &options).unwrap();

    let kinds: Vec<_> = search(&index, &LocaleKey::root(), "deploy", 5)
        .iter()
        .map(|r| r.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![FieldKind::Title, FieldKind::Header, FieldKind::Extra, FieldKind::Body]
    );
}

#[test]
fn test_earlier_offset_wins_within_a_kind() {
    let pages = vec![
        make_page("/late/", "Using the cache", ""),
        make_page("/early/", "Cache tuning", ""),
    ];
    let index = build_plain(&pages);
    assert_eq!(links(&index, "/", "cache", 5), vec!["/early/", "/late/"]);
}

#[test]
fn test_record_order_breaks_remaining_ties() {
    let pages = vec![
        make_page("/one/", "Routing", ""),
        make_page("/two/", "Routing", ""),
        make_page("/three/", "Routing", ""),
    ];
    let index = build_plain(&pages);
    assert_eq!(
        links(&index, "/", "routing", 5),
        vec!["/one/", "/two/", "/three/"]
    );
}

#[test]
fn test_matching_is_case_insensitive() {
    let index = build_plain(&install_config_site());
    assert_eq!(
        links(&index, "/", "INSTALL", 5),
        links(&index, "/", "install", 5)
    );
}
