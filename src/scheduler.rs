// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental rebuild scheduler.
//!
//! Content changes arrive as [`ChangeEvent`]s. Each one is resolved to the
//! locale partitions it touches, and each touched partition is rebuilt and
//! published. The caller never waits: `notify` puts the event on an unbounded
//! channel and returns.
//!
//! # Coalescing
//!
//! Per locale there is at most one rebuild in flight. A request that arrives
//! while one is running sets a single pending flag, so any number of requests
//! during one rebuild collapse into exactly one follow-up (trailing edge):
//!
//! ```text
//!   request ──▶ [idle] ──start──▶ [in flight] ──done──▶ [idle]
//!                                   │    ▲                │
//!                          request  ▼    │ done, pending  │
//!                                [in flight + pending] ───┘ start again
//! ```
//!
//! Different locales rebuild concurrently. The same locale never does.
//!
//! # Ownership
//!
//! One dispatcher task owns every slot, so no lock guards the coalescing state.
//! Rebuilds run on the blocking pool and report back over a second channel.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::artifact::ArtifactWriter;
use crate::build::{build_locale, IndexOptions};
use crate::error::{ArtifactError, RebuildError};
use crate::source::{Affected, ChangeEvent, PageLoad, PageSource};
use crate::types::{LocaleKey, LocalePartition};

/// Where rebuilt partitions go.
pub trait PartitionSink: Send + Sync + 'static {
    fn publish(&self, partition: &LocalePartition) -> Result<(), ArtifactError>;
}

impl PartitionSink for ArtifactWriter {
    fn publish(&self, partition: &LocalePartition) -> Result<(), ArtifactError> {
        self.write_partition(partition).map(|_| ())
    }
}

/// Counters reported by [`RebuildScheduler::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Events and explicit rebuild requests received.
    pub requests: usize,
    pub started: usize,
    pub completed: usize,
    pub failed: usize,
    /// Requests absorbed by an already-pending follow-up.
    pub coalesced: usize,
}

/// Result of one successful partition rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildOutcome {
    pub records: usize,
    pub diagnostics: usize,
    /// Every locale present in the page set at rebuild time.
    pub discovered: BTreeSet<LocaleKey>,
}

enum Request {
    Change(ChangeEvent),
    Rebuild(LocaleKey),
    RebuildAll,
    Stats(oneshot::Sender<SchedulerStats>),
    Shutdown,
}

struct Completion {
    locale: LocaleKey,
    outcome: Result<RebuildOutcome, RebuildError>,
}

#[derive(Debug, Default)]
struct Slot {
    in_flight: bool,
    pending: bool,
}

/// Cloneable sender side, for event producers such as the watcher.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    requests: mpsc::UnboundedSender<Request>,
}

impl SchedulerHandle {
    /// Report a content change. Returns `false` once the scheduler has stopped.
    pub fn notify(&self, event: ChangeEvent) -> bool {
        self.requests.send(Request::Change(event)).is_ok()
    }

    /// Rebuild one locale, coalesced like any other request.
    pub fn rebuild(&self, locale: LocaleKey) -> bool {
        self.requests.send(Request::Rebuild(locale)).is_ok()
    }

    /// Rebuild every known locale. Before the first load, that's whatever
    /// locales the page set turns out to contain.
    pub fn rebuild_all(&self) -> bool {
        self.requests.send(Request::RebuildAll).is_ok()
    }

    /// Counters so far, after every request sent before this one was taken in.
    pub async fn stats(&self) -> Option<SchedulerStats> {
        let (tx, rx) = oneshot::channel();
        self.requests.send(Request::Stats(tx)).ok()?;
        rx.await.ok()
    }
}

/// The running scheduler. Must be created inside a tokio runtime.
pub struct RebuildScheduler {
    handle: SchedulerHandle,
    task: JoinHandle<SchedulerStats>,
}

impl RebuildScheduler {
    pub fn spawn<S, K>(source: Arc<S>, sink: Arc<K>, options: IndexOptions) -> Self
    where
        S: PageSource,
        K: PartitionSink,
    {
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let dispatcher = Dispatcher {
            source,
            sink,
            options,
            slots: HashMap::new(),
            in_flight: 0,
            stats: SchedulerStats::default(),
            done: done_tx,
        };
        let task = tokio::spawn(dispatcher.run(requests_rx, done_rx));

        Self {
            handle: SchedulerHandle {
                requests: requests_tx,
            },
            task,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    pub fn notify(&self, event: ChangeEvent) -> bool {
        self.handle.notify(event)
    }

    pub fn rebuild(&self, locale: LocaleKey) -> bool {
        self.handle.rebuild(locale)
    }

    pub fn rebuild_all(&self) -> bool {
        self.handle.rebuild_all()
    }

    pub async fn stats(&self) -> Option<SchedulerStats> {
        self.handle.stats().await
    }

    /// Stop taking requests, let in-flight and pending rebuilds finish, and
    /// return the final counters.
    pub async fn shutdown(self) -> SchedulerStats {
        let _ = self.handle.requests.send(Request::Shutdown);
        match self.task.await {
            Ok(stats) => stats,
            Err(err) => {
                error!(error = %err, "rebuild dispatcher stopped abnormally");
                SchedulerStats::default()
            }
        }
    }
}

struct Dispatcher<S, K> {
    source: Arc<S>,
    sink: Arc<K>,
    options: IndexOptions,
    slots: HashMap<LocaleKey, Slot>,
    in_flight: usize,
    stats: SchedulerStats,
    done: mpsc::UnboundedSender<Completion>,
}

impl<S: PageSource, K: PartitionSink> Dispatcher<S, K> {
    async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<Request>,
        mut done: mpsc::UnboundedReceiver<Completion>,
    ) -> SchedulerStats {
        let mut closing = false;
        loop {
            if closing && self.in_flight == 0 {
                break;
            }
            tokio::select! {
                biased;
                request = requests.recv(), if !closing => match request {
                    Some(Request::Shutdown) | None => {
                        debug!(in_flight = self.in_flight, "scheduler draining");
                        closing = true;
                    }
                    Some(request) => self.on_request(request),
                },
                Some(completion) = done.recv() => self.on_completion(completion),
            }
        }
        info!(
            started = self.stats.started,
            completed = self.stats.completed,
            failed = self.stats.failed,
            coalesced = self.stats.coalesced,
            "rebuild scheduler stopped"
        );
        self.stats
    }

    fn on_request(&mut self, request: Request) {
        match request {
            Request::Change(event) => {
                self.stats.requests += 1;
                match self.source.affected_locales(&event) {
                    Affected::Nothing => {
                        debug!(path = %event.path.display(), "change does not touch page data")
                    }
                    Affected::Locales(locales) => {
                        for locale in locales {
                            self.request_rebuild(locale);
                        }
                    }
                    Affected::All => self.request_all(),
                }
            }
            Request::Rebuild(locale) => {
                self.stats.requests += 1;
                self.request_rebuild(locale);
            }
            Request::RebuildAll => {
                self.stats.requests += 1;
                self.request_all();
            }
            Request::Stats(reply) => {
                let _ = reply.send(self.stats);
            }
            Request::Shutdown => {}
        }
    }

    fn request_all(&mut self) {
        let mut locales = self.source.known_locales();
        locales.extend(self.slots.keys().cloned());
        if locales.is_empty() {
            // Nothing loaded yet: the root rebuild reports what else exists.
            locales.insert(LocaleKey::root());
        }
        for locale in locales {
            self.request_rebuild(locale);
        }
    }

    fn request_rebuild(&mut self, locale: LocaleKey) {
        let slot = self.slots.entry(locale.clone()).or_default();
        if !slot.in_flight {
            self.start(locale);
        } else if slot.pending {
            self.stats.coalesced += 1;
        } else {
            slot.pending = true;
        }
    }

    fn start(&mut self, locale: LocaleKey) {
        let slot = self.slots.entry(locale.clone()).or_default();
        slot.in_flight = true;
        slot.pending = false;
        self.in_flight += 1;
        self.stats.started += 1;
        debug!(%locale, "rebuild started");

        let source = Arc::clone(&self.source);
        let sink = Arc::clone(&self.sink);
        let options = self.options.clone();
        let done = self.done.clone();
        tokio::spawn(async move {
            let target = locale.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                rebuild_partition(source.as_ref(), sink.as_ref(), &options, &target)
            })
            .await
            .unwrap_or_else(|err| Err(RebuildError::Aborted(err.to_string())));
            let _ = done.send(Completion { locale, outcome });
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        let Completion { locale, outcome } = completion;
        self.in_flight -= 1;

        match outcome {
            Ok(outcome) => {
                self.stats.completed += 1;
                info!(
                    %locale,
                    records = outcome.records,
                    diagnostics = outcome.diagnostics,
                    "partition rebuilt"
                );
                let new_locales: Vec<_> = outcome
                    .discovered
                    .into_iter()
                    .filter(|discovered| !self.slots.contains_key(discovered))
                    .collect();
                for discovered in new_locales {
                    self.request_rebuild(discovered);
                }
            }
            Err(err) => {
                self.stats.failed += 1;
                warn!(%locale, error = %err, "partition rebuild failed");
            }
        }

        let follow_up = match self.slots.get_mut(&locale) {
            Some(slot) => {
                slot.in_flight = false;
                slot.pending
            }
            None => false,
        };
        if follow_up {
            self.start(locale);
        }
    }
}

/// Load, build one partition, publish. Runs on the blocking pool.
pub fn rebuild_partition<S, K>(
    source: &S,
    sink: &K,
    options: &IndexOptions,
    locale: &LocaleKey,
) -> Result<RebuildOutcome, RebuildError>
where
    S: PageSource + ?Sized,
    K: PartitionSink + ?Sized,
{
    let PageLoad { pages, unreadable } = source.load_readable()?;
    let skipped = unreadable.len();
    if let Some(file) = unreadable.into_iter().find(|file| file.blocks(locale)) {
        return Err(file.error.into());
    }
    if skipped > 0 {
        debug!(%locale, skipped, "built without unreadable pages of other locales");
    }
    let discovered = pages.iter().map(|page| page.locale_key()).collect();
    let (partition, report) = build_locale(&pages, locale, options)?;
    sink.publish(&partition)?;
    Ok(RebuildOutcome {
        records: partition.len(),
        diagnostics: report.diagnostics.len(),
        discovered,
    })
}
