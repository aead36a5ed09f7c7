//! Search against a naive oracle, plus result bounds.

use std::collections::HashSet;

use docsift::{build, search, FieldKind, LocaleKey, Page, SearchConfig, SearchableRecord};
use proptest::prelude::*;

use super::strategies::{query_strategy, site_strategy};

// =============================================================================
// ORACLE
// =============================================================================

fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Every (record, kind, field) match with its folded offset, ranked by brute force.
fn oracle(records: &[SearchableRecord], query: &str, max: usize) -> Vec<(String, FieldKind)> {
    let needle = fold(query.trim());
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for (order, record) in records.iter().enumerate() {
        for kind in FieldKind::ALL {
            let best = (0..record.field_count(kind))
                .filter_map(|field| {
                    let text = fold(record.field(kind, field)?);
                    let byte = text.find(&needle)?;
                    Some(text[..byte].chars().count())
                })
                .min();
            if let Some(offset) = best {
                hits.push(((kind.priority(), offset, order), record.path.clone(), kind));
            }
        }
    }
    hits.sort_by_key(|(rank, _, _)| *rank);
    hits.into_iter()
        .take(max)
        .map(|(_, path, kind)| (path, kind))
        .collect()
}

fn searchable_config() -> SearchConfig {
    SearchConfig::default()
}

fn index_of(pages: &[Page]) -> docsift::Index {
    build(pages, &searchable_config().index_options()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_search_matches_oracle(
        pages in site_strategy(8),
        query in query_strategy(),
        max in 1usize..8,
    ) {
        let index = index_of(&pages);
        let records = index
            .partition(&LocaleKey::root())
            .map(|p| p.records.clone())
            .unwrap_or_default();

        let actual: Vec<_> = search(&index, &LocaleKey::root(), &query, max)
            .iter()
            .map(|r| (r.record.path.clone(), r.kind))
            .collect();
        prop_assert_eq!(actual, oracle(&records, &query, max));
    }

    #[test]
    fn prop_result_count_bounded(
        pages in site_strategy(10),
        query in query_strategy(),
        max in 0usize..6,
    ) {
        let index = index_of(&pages);
        let results = search(&index, &LocaleKey::root(), &query, max);
        prop_assert!(results.len() <= max);
    }

    #[test]
    fn prop_excluded_pages_never_returned(
        pages in site_strategy(10),
        query in query_strategy(),
    ) {
        let excluded: HashSet<_> = pages
            .iter()
            .filter(|p| p.frontmatter.get("search") == Some(&serde_json::Value::Bool(false)))
            .map(|p| p.path.clone())
            .collect();
        let index = index_of(&pages);
        for result in search(&index, &LocaleKey::root(), &query, 50) {
            prop_assert!(!excluded.contains(&result.record.path));
        }
    }

    #[test]
    fn prop_results_are_ranked_and_unique(
        pages in site_strategy(10),
        query in query_strategy(),
    ) {
        let index = index_of(&pages);
        let results = search(&index, &LocaleKey::root(), &query, 50);

        for pair in results.windows(2) {
            prop_assert!(pair[0].rank <= pair[1].rank);
        }
        let keys: HashSet<_> = results.iter().map(|r| (r.record.path.as_str(), r.kind)).collect();
        prop_assert_eq!(keys.len(), results.len());
    }

    #[test]
    fn prop_highlight_is_the_query(
        pages in site_strategy(8),
        query in query_strategy(),
    ) {
        let index = index_of(&pages);
        for result in search(&index, &LocaleKey::root(), &query, 50) {
            let suggestion = docsift::Suggestion::from(&result);
            prop_assert_eq!(fold(suggestion.highlighted()), fold(query.trim()));
        }
    }
}
