// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subcommand implementations.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use docsift::artifact::{encode_partition, ArtifactHandle, ArtifactWriter};
use docsift::build::BuildReport;
use docsift::scheduler::{RebuildScheduler, SchedulerStats};
use docsift::source::{DirectorySource, PageSource};
use docsift::watch::PageWatcher;
use docsift::{
    load_partition, search_partition, FieldKind, Index, LocalePartition, Page, SearchConfig,
    Suggestion,
};

use super::display::{
    format_size, highlighted_excerpt, kind_badge, row, section_bot, section_top, themed, BOLD,
    BOX_WIDTH, CYAN, GRAY, GREEN, YELLOW,
};
use super::BuildArgs;

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => SearchConfig::from_file(path)
            .with_context(|| format!("invalid config {}", path.display())),
        None => Ok(SearchConfig::default()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INDEX
// ═══════════════════════════════════════════════════════════════════════════

pub fn run_index(args: &BuildArgs) -> Result<()> {
    let started = Instant::now();
    let config = load_config(args.config.as_deref())?;

    let source = DirectorySource::new(&args.input);
    let pages = source
        .load_pages()
        .with_context(|| format!("failed to load pages from {}", args.input.display()))?;

    let (index, report) = build_index(&pages, &config)?;
    let handles = ArtifactWriter::new(&args.output)
        .write(&index)
        .with_context(|| format!("failed to write artifacts to {}", args.output.display()))?;

    print_build_summary(&report, &handles, started.elapsed());
    Ok(())
}

#[cfg(feature = "parallel")]
fn build_index(pages: &[Page], config: &SearchConfig) -> Result<(Index, BuildReport)> {
    let progress = ProgressBar::new(pages.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("  extracting [{bar:30}] {pos}/{len} pages") {
        progress.set_style(style.progress_chars("=> "));
    }
    let result = docsift::build::build_with_progress(pages, &config.index_options(), &progress);
    progress.finish_and_clear();
    result.context("index build failed")
}

#[cfg(not(feature = "parallel"))]
fn build_index(pages: &[Page], config: &SearchConfig) -> Result<(Index, BuildReport)> {
    docsift::build_with_report(pages, &config.index_options()).context("index build failed")
}

fn print_build_summary(report: &BuildReport, handles: &[ArtifactHandle], elapsed: Duration) {
    section_top("docsift index");
    row(&format!(
        " pages {}   excluded {}   records {}   {:.0?}",
        themed(CYAN, &[BOLD], &report.pages_seen.to_string()),
        report.excluded,
        themed(GREEN, &[BOLD], &report.records.to_string()),
        elapsed
    ));
    if !report.diagnostics.is_empty() {
        row(&themed(
            YELLOW,
            &[],
            &format!(" {} pages had extra-field errors (see log)", report.diagnostics.len()),
        ));
    }
    row("");
    for handle in handles {
        let file = handle
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        row(&format!(
            " {:<8} {:<28} {:>6} records {:>10}",
            handle.locale.as_str(),
            file,
            handle.records,
            format_size(handle.bytes)
        ));
    }
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// WATCH
// ═══════════════════════════════════════════════════════════════════════════

pub async fn run_watch(args: &BuildArgs, debounce: Duration) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    // Notifications carry absolute paths; key the source the same way.
    let input = fs::canonicalize(&args.input)
        .with_context(|| format!("failed to resolve {}", args.input.display()))?;
    let source = Arc::new(DirectorySource::new(&input));
    let writer = Arc::new(ArtifactWriter::new(&args.output));

    let scheduler = RebuildScheduler::spawn(source, writer, config.index_options());
    let watcher = PageWatcher::start(&input, debounce)
        .with_context(|| format!("failed to watch {}", input.display()))?;
    scheduler.rebuild_all();
    let shutdown = CancellationToken::new();
    let watching = watcher.spawn(scheduler.handle(), shutdown.clone());

    info!(
        input = %input.display(),
        output = %args.output.display(),
        "watching for page changes (Ctrl-C to stop)"
    );
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    shutdown.cancel();
    match watching.await.context("watcher task panicked")? {
        Ok(()) => {}
        Err(err) => warn!(error = %err, "watcher ended with an error"),
    }
    let stats = scheduler.shutdown().await;
    print_watch_summary(&stats);
    Ok(())
}

fn print_watch_summary(stats: &SchedulerStats) {
    section_top("docsift watch");
    row(&format!(
        " requests {}   rebuilds {}   failed {}   coalesced {}",
        stats.requests,
        themed(GREEN, &[BOLD], &stats.completed.to_string()),
        stats.failed,
        stats.coalesced
    ));
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════

pub fn run_search(file: &Path, query: &str, limit: usize) -> Result<()> {
    let partition = load_partition(file)
        .with_context(|| format!("failed to load artifact {}", file.display()))?;

    let started = Instant::now();
    let suggestions: Vec<Suggestion> = search_partition(&partition, query, limit)
        .iter()
        .map(Suggestion::from)
        .collect();
    let elapsed = started.elapsed();

    section_top(&format!(
        "{} for \"{}\" in {}",
        plural(suggestions.len(), "suggestion"),
        query,
        partition.locale
    ));
    if suggestions.is_empty() {
        row(&themed(GRAY, &[], " no matches"));
    }
    for (i, suggestion) in suggestions.iter().enumerate() {
        row(&format!(
            " {}. {} {}  {}",
            i + 1,
            kind_badge(suggestion.kind),
            themed(CYAN, &[BOLD], &suggestion.title),
            themed(GRAY, &[], &suggestion.link)
        ));
        row(&format!("    {}", highlighted_excerpt(suggestion, BOX_WIDTH - 5)));
    }
    row(&themed(GRAY, &[], &format!(" matched in {:.1?}", elapsed)));
    section_bot();
    Ok(())
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

/// Records listed by `inspect` before eliding the rest.
const INSPECT_LISTED: usize = 10;

pub fn run_inspect(file: &Path) -> Result<()> {
    let size = fs::metadata(file)
        .with_context(|| format!("failed to stat {}", file.display()))?
        .len() as usize;
    let partition = load_partition(file)
        .with_context(|| format!("failed to load artifact {}", file.display()))?;
    let checksum = encode_partition(&partition)
        .context("failed to re-encode artifact")?
        .checksum;

    section_top("docsift inspect");
    row(&format!(" file      {}", file.display()));
    row(&format!(" locale    {}", themed(CYAN, &[BOLD], partition.locale.as_str())));
    row(&format!(" size      {}", format_size(size)));
    row(&format!(" checksum  {:08x} {}", checksum, themed(GREEN, &[], "verified")));
    row(&format!(" records   {}", partition.len()));
    row(&format!(
        " fields    {} headers, {} extra, {} excerpts",
        count_fields(&partition, FieldKind::Header),
        count_fields(&partition, FieldKind::Extra),
        count_fields(&partition, FieldKind::Body)
    ));
    row("");
    for record in partition.records.iter().take(INSPECT_LISTED) {
        row(&format!(" {}  {}", record.path, themed(GRAY, &[], &record.title)));
    }
    if partition.len() > INSPECT_LISTED {
        row(&themed(
            GRAY,
            &[],
            &format!(" ... {} more", partition.len() - INSPECT_LISTED),
        ));
    }
    section_bot();
    Ok(())
}

fn count_fields(partition: &LocalePartition, kind: FieldKind) -> usize {
    partition
        .records
        .iter()
        .map(|record| record.field_count(kind))
        .sum()
}
