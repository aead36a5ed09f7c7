// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel field extraction.
//!
//! Extraction is pure per page, so it's embarrassingly parallel. Rayon's indexed
//! `par_iter().map().collect()` keeps input order, which matters: record order is
//! the ranking tie-break. Without the `parallel` feature (WASM, tiny sites) the
//! same thing runs sequentially.

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

use super::extract::{extract, Extraction};
use super::options::IndexOptions;
use super::Page;

/// Extract every page, in input order.
#[cfg(feature = "parallel")]
pub fn extract_pages(pages: &[&Page], options: &IndexOptions) -> Vec<Extraction> {
    pages
        .par_iter()
        .map(|page| extract(page, options.extra_fields()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn extract_pages(pages: &[&Page], options: &IndexOptions) -> Vec<Extraction> {
    pages
        .iter()
        .map(|page| extract(page, options.extra_fields()))
        .collect()
}

/// Extract every page, ticking `progress` as pages finish.
#[cfg(feature = "parallel")]
pub fn extract_pages_with_progress(
    pages: &[&Page],
    options: &IndexOptions,
    progress: &ProgressBar,
) -> Vec<Extraction> {
    let counter = AtomicUsize::new(0);
    let total = pages.len();

    pages
        .par_iter()
        .map(|page| {
            let extraction = extract(page, options.extra_fields());

            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            if count % 10 == 0 || count == total {
                progress.set_message(format!("{}/{}", count, total));
            }

            extraction
        })
        .collect()
}
