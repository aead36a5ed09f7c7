// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query matching: lexical substring search over one locale partition.
//!
//! No scoring model, no fuzzy matching. A result's rank is the tuple
//! `(field priority, match offset, record order)`, so the output is a pure
//! function of the query and the partition.
//!
//! # Algorithm
//!
//! 1. Trim and case-fold the query. Empty means no results, never "everything".
//! 2. Walk records in partition order.
//! 3. For each field kind (title, header, extra, body) find the field of that
//!    kind with the earliest match. Ties go to the field that comes first in the
//!    document.
//! 4. Keep at most one result per `(record, kind)`.
//! 5. Stable-sort by rank and truncate.
//!
//! **Invariant**: a record contributes at most `FieldKind::ALL.len()` results.

mod suggestion;

pub use suggestion::Suggestion;

use crate::types::{FieldKind, Index, LocaleKey, LocalePartition, MatchResult, Rank, SearchableRecord};
use crate::utils::{find_folded, normalize_query};

/// Match `query` against the `locale` partition of `index`.
///
/// A locale without a partition yields no results. That's not an error: the index
/// only covers configured locales.
pub fn search<'a>(
    index: &'a Index,
    locale: &LocaleKey,
    query: &str,
    max_suggestions: usize,
) -> Vec<MatchResult<'a>> {
    match index.partition(locale) {
        Some(partition) => search_partition(partition, query, max_suggestions),
        None => Vec::new(),
    }
}

/// Match `query` against a single partition.
pub fn search_partition<'a>(
    partition: &'a LocalePartition,
    query: &str,
    max_suggestions: usize,
) -> Vec<MatchResult<'a>> {
    let needle = normalize_query(query);
    if needle.is_empty() || max_suggestions == 0 {
        return Vec::new();
    }

    let mut results: Vec<MatchResult<'a>> = partition
        .records
        .iter()
        .enumerate()
        .flat_map(|(order, record)| {
            let needle = needle.as_str();
            FieldKind::ALL
                .into_iter()
                .filter_map(move |kind| best_in_kind(record, order, kind, needle))
        })
        .collect();

    // Stable: equal ranks keep scan order.
    results.sort_by_key(|result| result.rank);
    results.truncate(max_suggestions);
    results
}

/// The best match among all fields of one kind in one record.
fn best_in_kind<'a>(
    record: &'a SearchableRecord,
    order: usize,
    kind: FieldKind,
    needle: &str,
) -> Option<MatchResult<'a>> {
    let mut best: Option<MatchResult<'a>> = None;

    for field in 0..record.field_count(kind) {
        let Some(text) = record.field(kind, field) else {
            continue;
        };
        let Some(span) = find_folded(text, needle) else {
            continue;
        };
        if best.is_some_and(|current| current.span.start <= span.start) {
            continue;
        }
        best = Some(MatchResult {
            record,
            kind,
            field,
            span,
            rank: Rank {
                priority: kind.priority(),
                offset: span.start,
                order,
            },
        });
    }

    best
}
