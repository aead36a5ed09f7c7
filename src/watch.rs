// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Filesystem watcher for a page-data directory.
//!
//! Platform notifications (via `notify`) are mapped to [`ChangeEvent`]s, held
//! for a short debounce window so an editor's burst of writes to one file
//! becomes one event, then handed to the rebuild scheduler. The scheduler does
//! the per-locale coalescing; the window only trims the obvious duplicates.
//!
//! | notify event              | change  |
//! |---------------------------|---------|
//! | `Create`                  | added   |
//! | `Modify(Name(From))`      | removed |
//! | `Modify(Name(To))`        | added   |
//! | `Modify(Name(Both))`      | removed + added |
//! | any other `Modify`        | changed |
//! | `Remove`                  | removed |
//!
//! Only page-data paths survive; everything else under the root is dropped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::scheduler::SchedulerHandle;
use crate::source::{is_page_data, ChangeEvent, ChangeKind};

/// Default debounce window.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Longest the loop blocks before checking for cancellation.
const CANCEL_CHECK: Duration = Duration::from_millis(100);

/// Translate one notification into page-data changes.
pub fn change_events(event: &Event) -> Vec<ChangeEvent> {
    let kinds: Vec<(&Path, ChangeKind)> = match event.kind {
        EventKind::Create(_) => tag(&event.paths, ChangeKind::Added),
        EventKind::Remove(_) => tag(&event.paths, ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            tag(&event.paths, ChangeKind::Removed)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            tag(&event.paths, ChangeKind::Added)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to] => vec![
                (from.as_path(), ChangeKind::Removed),
                (to.as_path(), ChangeKind::Added),
            ],
            paths => tag(paths, ChangeKind::Changed),
        },
        EventKind::Modify(_) => tag(&event.paths, ChangeKind::Changed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    };

    kinds
        .into_iter()
        .filter(|(path, _)| is_page_data(path))
        .map(|(path, kind)| ChangeEvent::new(path, kind))
        .collect()
}

fn tag(paths: &[PathBuf], kind: ChangeKind) -> Vec<(&Path, ChangeKind)> {
    paths.iter().map(|path| (path.as_path(), kind)).collect()
}

/// Changes waiting out the debounce window, one per path.
#[derive(Debug, Default)]
struct Pending {
    by_path: BTreeMap<PathBuf, ChangeKind>,
}

impl Pending {
    fn push(&mut self, event: ChangeEvent) {
        let merged = match (self.by_path.get(&event.path), event.kind) {
            // Created and deleted inside one window: never existed.
            (Some(ChangeKind::Added), ChangeKind::Removed) => None,
            (Some(ChangeKind::Added), ChangeKind::Changed) => Some(ChangeKind::Added),
            (Some(ChangeKind::Removed), ChangeKind::Added) => Some(ChangeKind::Changed),
            (_, kind) => Some(kind),
        };
        match merged {
            Some(kind) => {
                self.by_path.insert(event.path, kind);
            }
            None => {
                self.by_path.remove(&event.path);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Everything pending, in path order.
    fn take(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.by_path)
            .into_iter()
            .map(|(path, kind)| ChangeEvent::new(path, kind))
            .collect()
    }
}

/// A recursive watch on one page-data directory.
///
/// Watching starts in [`PageWatcher::start`], so nothing written after it
/// returns is missed. Events are delivered by [`run`](PageWatcher::run) or
/// [`spawn`](PageWatcher::spawn).
pub struct PageWatcher {
    root: PathBuf,
    debounce: Duration,
    events: std_mpsc::Receiver<notify::Result<Event>>,
    // Dropping the watcher ends the notification stream.
    _watcher: RecommendedWatcher,
}

impl PageWatcher {
    pub fn start(root: impl Into<PathBuf>, debounce: Duration) -> notify::Result<Self> {
        let root = root.into();
        let (watch_tx, events) = std_mpsc::channel();
        let mut watcher = RecommendedWatcher::new(watch_tx, NotifyConfig::default())?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!(root = %root.display(), debounce_ms = debounce.as_millis() as u64, "watching page data");
        Ok(Self {
            root,
            debounce,
            events,
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deliver debounced changes to `forward` until `shutdown` is cancelled,
    /// the notification stream ends, or `forward` returns `false`.
    ///
    /// Blocks the calling thread. Changes still inside the window when the
    /// loop stops are dropped.
    pub fn run<F>(self, mut forward: F, shutdown: &CancellationToken) -> notify::Result<()>
    where
        F: FnMut(ChangeEvent) -> bool,
    {
        let mut pending = Pending::default();
        let mut last_event = Instant::now();

        loop {
            if shutdown.is_cancelled() {
                break;
            }
            let wait = if pending.is_empty() {
                CANCEL_CHECK
            } else {
                self.debounce
                    .saturating_sub(last_event.elapsed())
                    .min(CANCEL_CHECK)
            };
            match self.events.recv_timeout(wait) {
                Ok(Ok(event)) => {
                    for change in change_events(&event) {
                        pending.push(change);
                    }
                    last_event = Instant::now();
                }
                Ok(Err(err)) => warn!(root = %self.root.display(), error = %err, "watcher error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if !pending.is_empty() && last_event.elapsed() >= self.debounce {
                for change in pending.take() {
                    debug!(path = %change.path.display(), kind = ?change.kind, "page data changed");
                    if !forward(change) {
                        debug!("change receiver closed, watcher stopping");
                        return Ok(());
                    }
                }
            }
        }
        debug!(root = %self.root.display(), "watcher stopped");
        Ok(())
    }

    /// Run on the blocking pool, forwarding changes to the scheduler.
    pub fn spawn(
        self,
        scheduler: SchedulerHandle,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<notify::Result<()>> {
        tokio::task::spawn_blocking(move || self.run(|change| scheduler.notify(change), &shutdown))
    }
}
