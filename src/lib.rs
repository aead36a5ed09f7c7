// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Client-side search for static documentation sites.
//!
//! Two halves. At build time the indexer turns generated page data into one
//! compact artifact per locale. At runtime the search box loads the artifact for
//! the current locale, matches what the user types, and handles the keyboard.
//!
//! # Architecture
//!
//! ```text
//!  page data ──▶ source ──▶ build ──▶ artifact ─ ─ ─▶ runtime ──▶ search
//!                  ▲        (extract,   (writer)       (loader)      ▲
//!   change events  │         locales)                                │
//!   ──▶ scheduler ─┘  (coalesced per-locale rebuilds)     interaction (FSM)
//!        ▲                                                      ▲
//!      watch                                               key presses
//! ```
//!
//! | Module        | Role                                                   |
//! |---------------|--------------------------------------------------------|
//! | `build`       | Field extraction and per-locale partitioning           |
//! | `search`      | Lexical matching, ranking, suggestion projection       |
//! | `artifact`    | Artifact encoding and atomic per-locale writes         |
//! | `runtime`     | Artifact loading, the swappable active index           |
//! | `interaction` | Hotkeys, debounce, suggestion window state machine     |
//! | `config`      | JSON configuration and locale resolution               |
//! | `source`      | Page providers and change-to-locale resolution         |
//! | `scheduler`   | Incremental rebuilds with trailing-edge coalescing     |
//! | `watch`       | Filesystem events (notify) feeding the scheduler       |
//!
//! The indexer half (`source`, `scheduler`, `watch`, the artifact writer) is
//! behind the default `indexer` feature; the browser build leaves it out.
//!
//! # Usage
//!
//! ```ignore
//! use docsift::{build, search, IndexOptions, LocaleKey, Page};
//!
//! let index = build(&pages, &IndexOptions::new())?;
//! for result in search(&index, &LocaleKey::root(), "install", 5) {
//!     println!("{} {}", result.record.title, result.link());
//! }
//! ```

pub mod artifact;
pub mod build;
pub mod config;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod runtime;
pub mod search;
pub mod testing;
mod types;
mod utils;

#[cfg(feature = "indexer")]
pub mod scheduler;
#[cfg(feature = "indexer")]
pub mod source;
#[cfg(feature = "indexer")]
pub mod watch;

pub use artifact::{decode_partition, encode_partition, ArtifactManifest, ManifestEntry};
#[cfg(feature = "indexer")]
pub use artifact::{ArtifactHandle, ArtifactWriter};
pub use build::{build, build_locale, build_with_report, extract, BuildReport, IndexOptions, Page};
pub use config::{LocaleResolver, SearchConfig};
pub use error::{
    ArtifactError, BuildError, ConfigError, ExtraFieldsError, ExtractionFieldError, LoadError,
    RebuildError, SourceError,
};
pub use interaction::{
    ControllerConfig, Effect, Event, HotKey, InteractionState, KeyPress, Phase, SearchController,
};
pub use runtime::{load_index, load_partition, IndexHandle};
#[cfg(feature = "indexer")]
pub use scheduler::{PartitionSink, RebuildScheduler, SchedulerHandle, SchedulerStats};
pub use search::{search, search_partition, Suggestion};
#[cfg(feature = "indexer")]
pub use source::{ChangeEvent, ChangeKind, DirectorySource, MemorySource, PageSource};
pub use types::{
    FieldKind, Header, Index, LocaleKey, LocalePartition, MatchResult, Rank, SearchableRecord,
    TextSpan, DEFAULT_LOCALE,
};
pub use utils::normalize_query;
