// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a search index.
//!
//! A site is split into locale partitions (`/`, `/zh/`, ...). Each partition is an
//! ordered list of `SearchableRecord`s, one per searchable page, and that order is
//! the base tie-break for ranking. Nothing in here knows how pages are produced or
//! how results are rendered.
//!
//! # Invariants
//!
//! - **LocalePartition**: record paths are unique, every record's `locale` equals
//!   the partition's locale.
//! - **Index**: partitions are keyed by locale and replaced wholesale, so rebuilding
//!   one locale never touches another.
//! - **Rank**: ordered by `(priority, offset, order)`. Lower is better.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Path prefix of the default locale partition.
pub const DEFAULT_LOCALE: &str = "/";

// =============================================================================
// LOCALE KEYS
// =============================================================================

/// A locale partition key: a route prefix that always starts and ends with `/`.
///
/// `"zh"`, `"/zh"` and `"/zh/"` all name the same partition. An empty prefix is the
/// default partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LocaleKey(String);

impl LocaleKey {
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            Self::root()
        } else {
            LocaleKey(format!("/{}/", trimmed))
        }
    }

    /// The default partition (`/`).
    pub fn root() -> Self {
        LocaleKey(DEFAULT_LOCALE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == DEFAULT_LOCALE
    }

    /// Filesystem-safe name: `root` for `/`, `zh` for `/zh/`, `en-us` for `/en/us/`.
    pub fn slug(&self) -> String {
        if self.is_root() {
            return "root".to_string();
        }
        self.0.trim_matches('/').replace('/', "-")
    }

    /// Does `route` live under this prefix?
    pub fn contains_route(&self, route: &str) -> bool {
        route.starts_with(self.as_str()) || route == self.0.trim_end_matches('/')
    }
}

impl Default for LocaleKey {
    fn default() -> Self {
        Self::root()
    }
}

impl From<String> for LocaleKey {
    fn from(value: String) -> Self {
        LocaleKey::new(&value)
    }
}

impl From<&str> for LocaleKey {
    fn from(value: &str) -> Self {
        LocaleKey::new(value)
    }
}

impl From<LocaleKey> for String {
    fn from(key: LocaleKey) -> Self {
        key.0
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Which searchable field a match landed in.
///
/// Declaration order is rank priority: a title match always beats a header match,
/// which beats an extra-field match, which beats a body excerpt match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Title,
    Header,
    Extra,
    Body,
}

impl FieldKind {
    /// All kinds in priority order.
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Title,
        FieldKind::Header,
        FieldKind::Extra,
        FieldKind::Body,
    ];

    /// Primary rank key. Lower is better.
    pub fn priority(self) -> u8 {
        match self {
            FieldKind::Title => 0,
            FieldKind::Header => 1,
            FieldKind::Extra => 2,
            FieldKind::Body => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Header => "header",
            FieldKind::Extra => "extra",
            FieldKind::Body => "body",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section header, flattened out of the page's header tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub text: String,
    /// Nesting depth; 1 is a top-level section.
    pub depth: u8,
    /// Anchor id for deep links (may be empty).
    pub anchor: String,
}

/// Everything the runtime needs to match and link one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableRecord {
    pub path: String,
    pub locale: LocaleKey,
    pub title: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub excerpts: Vec<String>,
    #[serde(default)]
    pub extra_fields: Vec<String>,
}

impl SearchableRecord {
    /// Number of fields of the given kind (the title counts as one).
    pub fn field_count(&self, kind: FieldKind) -> usize {
        match kind {
            FieldKind::Title => 1,
            FieldKind::Header => self.headers.len(),
            FieldKind::Extra => self.extra_fields.len(),
            FieldKind::Body => self.excerpts.len(),
        }
    }

    /// Text of the `position`-th field of `kind`, in document order.
    pub fn field(&self, kind: FieldKind, position: usize) -> Option<&str> {
        match kind {
            FieldKind::Title if position == 0 => Some(&self.title),
            FieldKind::Title => None,
            FieldKind::Header => self.headers.get(position).map(|h| h.text.as_str()),
            FieldKind::Extra => self.extra_fields.get(position).map(String::as_str),
            FieldKind::Body => self.excerpts.get(position).map(String::as_str),
        }
    }

    /// Link to the page, or to a header anchor within it.
    pub fn link(&self, kind: FieldKind, position: usize) -> String {
        match kind {
            FieldKind::Header => match self.headers.get(position) {
                Some(header) if !header.anchor.is_empty() => {
                    format!("{}#{}", self.path, header.anchor)
                }
                _ => self.path.clone(),
            },
            _ => self.path.clone(),
        }
    }
}

// =============================================================================
// INDEX
// =============================================================================

/// One locale's records, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalePartition {
    pub locale: LocaleKey,
    pub records: Vec<SearchableRecord>,
}

impl LocalePartition {
    pub fn new(locale: LocaleKey) -> Self {
        Self {
            locale,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&SearchableRecord> {
        self.records.iter().find(|record| record.path == path)
    }
}

/// The whole site index: locale → partition.
///
/// A `BTreeMap` so iteration (and therefore artifact output) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    partitions: BTreeMap<LocaleKey, LocalePartition>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(&self, locale: &LocaleKey) -> Option<&LocalePartition> {
        self.partitions.get(locale)
    }

    /// Swap in a freshly built partition, returning the one it replaced.
    pub fn replace_partition(&mut self, partition: LocalePartition) -> Option<LocalePartition> {
        self.partitions.insert(partition.locale.clone(), partition)
    }

    pub fn remove_partition(&mut self, locale: &LocaleKey) -> Option<LocalePartition> {
        self.partitions.remove(locale)
    }

    pub fn partitions(&self) -> impl Iterator<Item = &LocalePartition> {
        self.partitions.values()
    }

    pub fn locales(&self) -> impl Iterator<Item = &LocaleKey> {
        self.partitions.keys()
    }

    /// Total records across all partitions.
    pub fn record_count(&self) -> usize {
        self.partitions.values().map(LocalePartition::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

// =============================================================================
// MATCHES
// =============================================================================

/// Character offsets (Unicode scalar values, not bytes) into a field's stored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Sort key for a match. Field order is comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank {
    /// `FieldKind::priority()` of the matched field.
    pub priority: u8,
    /// Character offset of the match within its field.
    pub offset: usize,
    /// Position of the record in the partition.
    pub order: usize,
}

/// One ranked hit. Borrows the partition it was found in, so it cannot outlive
/// the query that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub record: &'a SearchableRecord,
    pub kind: FieldKind,
    /// Which field of `kind` matched (header index, excerpt index, ...).
    pub field: usize,
    pub span: TextSpan,
    pub rank: Rank,
}

impl<'a> MatchResult<'a> {
    /// The full text of the matched field.
    pub fn text(&self) -> &'a str {
        self.record.field(self.kind, self.field).unwrap_or_default()
    }

    pub fn link(&self) -> String {
        self.record.link(self.kind, self.field)
    }
}
