// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index building: pages in, locale partitions out.
//!
//! `build` runs the whole site, `build_locale` rebuilds a single partition (that's
//! what the rebuild scheduler calls). Both are idempotent and re-entrant: no state
//! survives between calls, and the same pages always produce the same partitions.
//!
//! Pages rejected by the searchable predicate never become records, not even empty
//! ones. That's what makes "excluded pages never show up in results" hold without
//! the matcher having to know about the predicate.

pub mod extract;
pub mod options;
pub mod page;
pub mod parallel;

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

pub use extract::{extract, segment_body, Extraction, EXCERPT_MAX_CHARS};
pub use options::{ExtraFieldsFn, IndexOptions, SearchableFn};
pub use page::{Page, PageHeader};
pub use parallel::extract_pages;
#[cfg(feature = "parallel")]
pub use parallel::extract_pages_with_progress;

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;

use crate::error::{BuildError, ExtractionFieldError};
use crate::types::{Index, LocaleKey, LocalePartition, SearchableRecord};

/// What happened during a build, beyond the index itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Pages looked at (before the predicate).
    pub pages_seen: usize,
    /// Pages the predicate rejected.
    pub excluded: usize,
    /// Records written into partitions.
    pub records: usize,
    /// Per-page extra-field failures. The pages were still indexed.
    pub diagnostics: Vec<ExtractionFieldError>,
}

/// Build the full index.
///
/// Fails if any partition fails: a one-shot build should not ship a silently
/// partial index.
pub fn build(pages: &[Page], options: &IndexOptions) -> Result<Index, BuildError> {
    build_with_report(pages, options).map(|(index, _)| index)
}

/// `build`, plus the `BuildReport`.
pub fn build_with_report(
    pages: &[Page],
    options: &IndexOptions,
) -> Result<(Index, BuildReport), BuildError> {
    build_all(pages, options, |searchable| extract_pages(searchable, options))
}

/// `build_with_report`, advancing `progress` once per extracted page.
#[cfg(feature = "parallel")]
pub fn build_with_progress(
    pages: &[Page],
    options: &IndexOptions,
    progress: &ProgressBar,
) -> Result<(Index, BuildReport), BuildError> {
    build_all(pages, options, |searchable| {
        progress.set_length(searchable.len() as u64);
        extract_pages_with_progress(searchable, options, progress)
    })
}

fn build_all<F>(
    pages: &[Page],
    options: &IndexOptions,
    extract_all: F,
) -> Result<(Index, BuildReport), BuildError>
where
    F: FnOnce(&[&Page]) -> Vec<Extraction>,
{
    let searchable = select_searchable(pages, options, None);
    let mut report = BuildReport {
        pages_seen: pages.len(),
        excluded: pages.len() - searchable.len(),
        ..BuildReport::default()
    };

    let extractions = extract_all(&searchable);
    let partitions = assemble(extractions, &mut report);

    let mut index = Index::new();
    for (locale, records) in partitions {
        let partition = checked_partition(locale, records)?;
        debug!(locale = %partition.locale, records = partition.len(), "built partition");
        index.replace_partition(partition);
    }

    info!(
        partitions = index.partitions().count(),
        records = report.records,
        excluded = report.excluded,
        "search index built"
    );
    Ok((index, report))
}

/// Build one locale's partition from the full page set.
///
/// Pages from other locales are ignored, so the result is the same partition
/// `build` would have produced for `locale`. A locale with no searchable pages
/// yields an empty partition.
pub fn build_locale(
    pages: &[Page],
    locale: &LocaleKey,
    options: &IndexOptions,
) -> Result<(LocalePartition, BuildReport), BuildError> {
    let in_locale = pages.iter().filter(|page| &page.locale_key() == locale).count();
    let searchable = select_searchable(pages, options, Some(locale));
    let mut report = BuildReport {
        pages_seen: in_locale,
        excluded: in_locale - searchable.len(),
        ..BuildReport::default()
    };

    let extractions = extract_pages(&searchable, options);
    let mut partitions = assemble(extractions, &mut report);
    let records = partitions.remove(locale).unwrap_or_default();
    let partition = checked_partition(locale.clone(), records)?;

    debug!(locale = %locale, records = partition.len(), "rebuilt partition");
    Ok((partition, report))
}

fn select_searchable<'a>(
    pages: &'a [Page],
    options: &IndexOptions,
    locale: Option<&LocaleKey>,
) -> Vec<&'a Page> {
    pages
        .iter()
        .filter(|page| locale.map_or(true, |locale| &page.locale_key() == locale))
        .filter(|page| {
            let keep = options.is_searchable(page);
            if !keep {
                debug!(path = %page.path, "page excluded from search index");
            }
            keep
        })
        .collect()
}

/// Group records by locale, keeping input order within each locale.
fn assemble(
    extractions: Vec<Extraction>,
    report: &mut BuildReport,
) -> BTreeMap<LocaleKey, Vec<SearchableRecord>> {
    let mut partitions: BTreeMap<LocaleKey, Vec<SearchableRecord>> = BTreeMap::new();
    for extraction in extractions {
        if let Some(diagnostic) = extraction.diagnostic {
            report.diagnostics.push(diagnostic);
        }
        report.records += 1;
        partitions
            .entry(extraction.record.locale.clone())
            .or_default()
            .push(extraction.record);
    }
    partitions
}

/// Enforce the partition invariants: non-empty, unique paths.
fn checked_partition(
    locale: LocaleKey,
    records: Vec<SearchableRecord>,
) -> Result<LocalePartition, BuildError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if record.path.is_empty() {
            return Err(BuildError::EmptyPath { locale });
        }
        if !seen.insert(record.path.as_str()) {
            return Err(BuildError::DuplicatePath {
                locale,
                path: record.path.clone(),
            });
        }
    }
    Ok(LocalePartition { locale, records })
}
