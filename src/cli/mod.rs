// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the docsift command-line interface.
//!
//! Four subcommands: `index` builds one artifact per locale from a directory of
//! page-data files, `watch` does the same and then keeps the artifacts current
//! as pages change, `search` queries an artifact, and `inspect` summarizes one.

pub mod commands;
pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docsift",
    about = "Client-side search index builder for static documentation sites",
    version
)]
pub struct Cli {
    /// Log at DEBUG (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input/output shared by `index` and `watch`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Directory of page-data JSON files (searched recursively)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for search-index.<locale>.json and manifest.json
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON config file (searchable rules, extra fields, ...)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build search index artifacts from a directory of page-data files
    Index {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Build, then rebuild affected locales whenever page data changes
    Watch {
        #[command(flatten)]
        args: BuildArgs,

        /// Quiet period in milliseconds before a burst of file events is applied
        #[arg(long, alias = "interval-ms", default_value_t = docsift::watch::DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,
    },

    /// Search an artifact and display suggestions
    Search {
        /// Path to a search-index.<locale>.json artifact
        file: PathBuf,

        /// Search query
        query: String,

        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = docsift::config::DEFAULT_MAX_SUGGESTIONS)]
        limit: usize,
    },

    /// Verify an artifact and summarize its contents
    Inspect {
        /// Path to a search-index.<locale>.json artifact
        file: PathBuf,
    },
}
