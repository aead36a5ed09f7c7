//! Build invariants: determinism, exclusion, record shape.

use docsift::build::EXCERPT_MAX_CHARS;
use docsift::{build, build_locale, LocaleKey, SearchConfig};
use proptest::prelude::*;

use super::strategies::{site_strategy, text_strategy};
use super::common::make_page;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_build_is_deterministic(pages in site_strategy(10)) {
        let options = SearchConfig::default().index_options();
        prop_assert_eq!(build(&pages, &options).unwrap(), build(&pages, &options).unwrap());
    }

    #[test]
    fn prop_records_follow_searchable_pages(pages in site_strategy(10)) {
        let options = SearchConfig::default().index_options();
        let index = build(&pages, &options).unwrap();

        let expected: Vec<_> = pages
            .iter()
            .filter(|p| options.is_searchable(p))
            .map(|p| p.path.as_str())
            .collect();
        let actual: Vec<_> = index
            .partitions()
            .flat_map(|p| p.records.iter().map(|r| r.path.as_str()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_partition_rebuild_equals_full_build(pages in site_strategy(10)) {
        let options = SearchConfig::default().index_options();
        let full = build(&pages, &options).unwrap();
        let (partition, _) = build_locale(&pages, &LocaleKey::root(), &options).unwrap();

        match full.partition(&LocaleKey::root()) {
            Some(expected) => prop_assert_eq!(&partition, expected),
            None => prop_assert!(partition.is_empty()),
        }
    }

    #[test]
    fn prop_excerpts_bounded_and_lossless(words in text_strategy(200)) {
        let index = build(&[make_page("/p/", "P", &words)], &SearchConfig::default().index_options())
            .unwrap();
        let record = &index.partition(&LocaleKey::root()).unwrap().records[0];

        for excerpt in &record.excerpts {
            prop_assert!(!excerpt.is_empty());
            prop_assert!(excerpt.chars().count() <= EXCERPT_MAX_CHARS);
        }
        prop_assert_eq!(record.excerpts.join(" "), words.split_whitespace().collect::<Vec<_>>().join(" "));
    }
}
