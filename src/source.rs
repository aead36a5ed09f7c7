// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Page sources: where the rebuild scheduler gets pages from.
//!
//! A source does two jobs. It loads the current page set, and it tells the
//! scheduler which locale partitions a change event touches. The second job needs
//! memory: a removed page-data file can't be opened to find its locale, so each
//! source remembers the locale every path had at the last load.
//!
//! Resolution rules (same for every source):
//!
//! | Event           | Affected locales                                  |
//! |-----------------|---------------------------------------------------|
//! | added / changed | current locale ∪ locale at last load (moves)      |
//! | removed         | locale at last load                               |
//! | anything else   | all known locales (can't tell, so rebuild all)    |

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::build::Page;
use crate::error::SourceError;
use crate::types::LocaleKey;

/// Kind of content change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
}

/// A content-change notification, keyed by the path of the changed page data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn added(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Added)
    }

    pub fn changed(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Changed)
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Removed)
    }
}

/// Which partitions an event invalidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affected {
    /// Not page data; nothing to rebuild.
    Nothing,
    Locales(BTreeSet<LocaleKey>),
    /// Couldn't tell. Rebuild every known locale.
    All,
}

/// A page-data file that could not be read or parsed.
#[derive(Debug)]
pub struct UnreadablePage {
    pub path: PathBuf,
    /// The file's locale at the last load it succeeded in, if any.
    pub locale: Option<LocaleKey>,
    pub error: SourceError,
}

impl UnreadablePage {
    /// Whether this file keeps `locale` from building.
    ///
    /// A file blocks the locale it belonged to. A file whose locale was never
    /// known blocks every locale, since it might belong to any of them.
    pub fn blocks(&self, locale: &LocaleKey) -> bool {
        self.locale.as_ref().map_or(true, |known| known == locale)
    }
}

/// Result of a tolerant load: every readable page plus what was skipped.
#[derive(Debug, Default)]
pub struct PageLoad {
    pub pages: Vec<Page>,
    pub unreadable: Vec<UnreadablePage>,
}

impl PageLoad {
    /// The first skipped file that blocks a build of `locale`.
    pub fn blocking(&self, locale: &LocaleKey) -> Option<&UnreadablePage> {
        self.unreadable.iter().find(|file| file.blocks(locale))
    }

    /// Fail on the first skipped file, whatever its locale.
    pub fn into_pages(self) -> Result<Vec<Page>, SourceError> {
        match self.unreadable.into_iter().next() {
            Some(file) => Err(file.error),
            None => Ok(self.pages),
        }
    }
}

/// Provider of the page set.
pub trait PageSource: Send + Sync + 'static {
    /// Load every page, in document order.
    fn load_pages(&self) -> Result<Vec<Page>, SourceError>;

    /// Load every readable page, setting unreadable ones aside.
    ///
    /// Only errors that affect the whole source (an unreadable root) are
    /// returned as `Err`. Sources whose pages can't fail individually keep the
    /// default.
    fn load_readable(&self) -> Result<PageLoad, SourceError> {
        Ok(PageLoad {
            pages: self.load_pages()?,
            unreadable: Vec::new(),
        })
    }

    /// Which locale partitions `event` affects.
    fn affected_locales(&self, event: &ChangeEvent) -> Affected;

    /// Locales seen at the last successful load.
    fn known_locales(&self) -> BTreeSet<LocaleKey>;
}

/// Path → locale as of the last load.
#[derive(Debug, Default)]
struct LocaleRegistry {
    by_path: RwLock<HashMap<PathBuf, LocaleKey>>,
}

impl LocaleRegistry {
    fn replace(&self, entries: HashMap<PathBuf, LocaleKey>) {
        *self.by_path.write() = entries;
    }

    fn get(&self, path: &Path) -> Option<LocaleKey> {
        self.by_path.read().get(path).cloned()
    }

    fn locales(&self) -> BTreeSet<LocaleKey> {
        self.by_path.read().values().cloned().collect()
    }

    /// Apply the resolution table, given the page's locale right now (if readable).
    fn resolve(&self, event: &ChangeEvent, current: Option<LocaleKey>) -> Affected {
        let previous = self.get(&event.path);
        let mut locales = BTreeSet::new();
        match event.kind {
            ChangeKind::Removed => locales.extend(previous),
            ChangeKind::Added | ChangeKind::Changed => {
                locales.extend(current);
                locales.extend(previous);
            }
        }
        if locales.is_empty() {
            Affected::All
        } else {
            Affected::Locales(locales)
        }
    }
}

// =============================================================================
// DIRECTORY SOURCE
// =============================================================================

/// Page-data JSON files under a root directory, one page per file.
///
/// Files are read in path order, which makes that the document order. Non-JSON
/// files are ignored.
#[derive(Debug)]
pub struct DirectorySource {
    root: PathBuf,
    registry: LocaleRegistry,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registry: LocaleRegistry::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Event paths may be relative to the root or absolute.
    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read_page(path: &Path) -> Result<Page, SourceError> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Every `*.json` file under `root`, sorted.
pub fn page_data_files(root: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| SourceError::Walk {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && is_page_data(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Whether `path` names a page-data file.
pub fn is_page_data(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

impl PageSource for DirectorySource {
    fn load_pages(&self) -> Result<Vec<Page>, SourceError> {
        self.load_readable()?.into_pages()
    }

    fn load_readable(&self) -> Result<PageLoad, SourceError> {
        let files = page_data_files(&self.root)?;
        let mut load = PageLoad {
            pages: Vec::with_capacity(files.len()),
            unreadable: Vec::new(),
        };
        let mut registry = HashMap::with_capacity(files.len());

        for path in files {
            match Self::read_page(&path) {
                Ok(page) => {
                    registry.insert(path, page.locale_key());
                    load.pages.push(page);
                }
                Err(error) => {
                    // Keep the last good locale so a later fix or removal
                    // still resolves to the right partition.
                    let locale = self.registry.get(&path);
                    warn!(path = %path.display(), error = %error, "skipping unreadable page data");
                    if let Some(locale) = &locale {
                        registry.insert(path.clone(), locale.clone());
                    }
                    load.unreadable.push(UnreadablePage {
                        path,
                        locale,
                        error,
                    });
                }
            }
        }

        debug!(
            root = %self.root.display(),
            pages = load.pages.len(),
            unreadable = load.unreadable.len(),
            "loaded page data"
        );
        self.registry.replace(registry);
        Ok(load)
    }

    fn affected_locales(&self, event: &ChangeEvent) -> Affected {
        let path = self.absolute(&event.path);
        if !is_page_data(&path) {
            return Affected::Nothing;
        }
        let event = ChangeEvent::new(path, event.kind);

        let current = match event.kind {
            ChangeKind::Removed => None,
            ChangeKind::Added | ChangeKind::Changed => {
                Self::read_page(&event.path).ok().map(|page| page.locale_key())
            }
        };
        self.registry.resolve(&event, current)
    }

    fn known_locales(&self) -> BTreeSet<LocaleKey> {
        self.registry.locales()
    }
}

// =============================================================================
// MEMORY SOURCE
// =============================================================================

/// Pages held in memory, keyed by page path. Event paths are page paths.
///
/// For embedding the indexer in another build tool, and for tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: RwLock<Vec<Page>>,
    registry: LocaleRegistry,
}

impl MemorySource {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages: RwLock::new(pages),
            registry: LocaleRegistry::default(),
        }
    }

    /// Insert or replace a page (matched by path), returning the event to report.
    pub fn upsert(&self, page: Page) -> ChangeEvent {
        let mut pages = self.pages.write();
        let path = page.path.clone();
        match pages.iter_mut().find(|existing| existing.path == page.path) {
            Some(existing) => {
                *existing = page;
                ChangeEvent::changed(path)
            }
            None => {
                pages.push(page);
                ChangeEvent::added(path)
            }
        }
    }

    /// Remove a page by path.
    pub fn remove(&self, path: &str) -> Option<ChangeEvent> {
        let mut pages = self.pages.write();
        let position = pages.iter().position(|page| page.path == path)?;
        pages.remove(position);
        Some(ChangeEvent::removed(path))
    }
}

impl PageSource for MemorySource {
    fn load_pages(&self) -> Result<Vec<Page>, SourceError> {
        let pages = self.pages.read().clone();
        self.registry.replace(
            pages
                .iter()
                .map(|page| (PathBuf::from(&page.path), page.locale_key()))
                .collect(),
        );
        Ok(pages)
    }

    fn affected_locales(&self, event: &ChangeEvent) -> Affected {
        let current = self
            .pages
            .read()
            .iter()
            .find(|page| Path::new(&page.path) == event.path)
            .map(Page::locale_key);
        let current = match event.kind {
            ChangeKind::Removed => None,
            ChangeKind::Added | ChangeKind::Changed => current,
        };
        self.registry.resolve(event, current)
    }

    fn known_locales(&self) -> BTreeSet<LocaleKey> {
        self.registry.locales()
    }
}
