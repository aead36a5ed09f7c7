// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search box as an explicit state machine.
//!
//! The UI layer translates DOM events into [`Event`]s, feeds them to
//! [`SearchController::handle`], and carries out the returned [`Effect`]s
//! (focus the input, cancel the browser default, navigate, arm a timer). The
//! controller never touches the UI itself, so every transition is testable
//! without one.
//!
//! # Phases
//!
//! ```text
//!            hotkey / focus              input (matches)
//!   Closed ─────────────────▶ Querying ─────────────────▶ Showing
//!     ▲                          │  ▲                        │
//!     │     escape / blur        │  └──── input (no match) ──┘
//!     └──────────────────────────┴──── escape / blur / enter / select
//! ```
//!
//! # Debounce
//!
//! With a zero debounce window, matching runs synchronously on every input.
//! Otherwise an input returns `Effect::ScheduleRefresh { delay, token }` and the
//! host sends `Event::Tick(token)` when the timer fires. Only the newest token
//! refreshes; older timers are ignored. Enter flushes a pending refresh first, so
//! it always acts on the query the user sees.

pub mod hotkey;

pub use hotkey::{HotKey, HotKeySpec, KeyPress, Modifiers};

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_SUGGESTIONS;
use crate::runtime::IndexHandle;
use crate::search::{search_partition, Suggestion};
use crate::utils::normalize_query;

/// Runtime settings for one search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub hot_keys: Vec<HotKey>,
    pub max_suggestions: usize,
    pub debounce: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            hot_keys: hotkey::default_hot_keys()
                .into_iter()
                .map(HotKey::from)
                .collect(),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            debounce: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    /// Open, no suggestions.
    Querying,
    /// Open, at least one suggestion.
    Showing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    HotKey(KeyPress),
    Focus,
    Blur,
    Input(String),
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    /// Pointer moved over suggestion `i`.
    Hover(usize),
    /// Pointer activated suggestion `i`.
    Select(usize),
    /// A scheduled refresh timer fired.
    Tick(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FocusInput,
    PreventDefault,
    Navigate(String),
    ScheduleRefresh { delay: Duration, token: u64 },
}

/// What the UI renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub phase: Phase,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    /// `None` when there is nothing to highlight.
    pub highlighted: Option<usize>,
}

impl InteractionState {
    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn highlighted_suggestion(&self) -> Option<&Suggestion> {
        self.highlighted.and_then(|i| self.suggestions.get(i))
    }
}

pub struct SearchController {
    config: ControllerConfig,
    index: IndexHandle,
    state: InteractionState,
    /// Token of the refresh still owed, if any.
    pending: Option<u64>,
    next_token: u64,
    reported_unavailable: bool,
}

impl SearchController {
    pub fn new(config: ControllerConfig, index: IndexHandle) -> Self {
        Self {
            config,
            index,
            state: InteractionState::default(),
            pending: None,
            next_token: 0,
            reported_unavailable: false,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    /// Swap the active index and re-run the current query against it.
    pub fn replace_index(&mut self, index: IndexHandle) {
        self.index = index;
        self.reported_unavailable = false;
        if self.state.is_open() {
            self.pending = None;
            self.refresh();
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::HotKey(press) => self.on_hot_key(&press),
            Event::Focus => {
                self.open();
                Vec::new()
            }
            Event::Blur | Event::Escape => {
                self.close();
                Vec::new()
            }
            Event::Input(text) => self.on_input(text),
            Event::ArrowDown => {
                self.move_highlight(1);
                Vec::new()
            }
            Event::ArrowUp => {
                self.move_highlight(-1);
                Vec::new()
            }
            Event::Enter => {
                if self.pending.take().is_some() {
                    self.refresh();
                }
                match self.state.highlighted {
                    Some(i) => self.activate(i),
                    None => Vec::new(),
                }
            }
            Event::Hover(i) => {
                if i < self.state.suggestions.len() {
                    self.state.highlighted = Some(i);
                }
                Vec::new()
            }
            Event::Select(i) => self.activate(i),
            Event::Tick(token) => {
                if self.pending == Some(token) {
                    self.pending = None;
                    self.refresh();
                }
                Vec::new()
            }
        }
    }

    fn on_hot_key(&mut self, press: &KeyPress) -> Vec<Effect> {
        if self.state.is_open() || press.in_editable {
            return Vec::new();
        }
        if !self.config.hot_keys.iter().any(|hotkey| hotkey.matches(press)) {
            return Vec::new();
        }
        self.open();
        vec![Effect::FocusInput, Effect::PreventDefault]
    }

    fn on_input(&mut self, text: String) -> Vec<Effect> {
        self.open();
        self.state.query = text;

        if self.config.debounce.is_zero() {
            self.pending = None;
            self.refresh();
            return Vec::new();
        }

        self.next_token += 1;
        self.pending = Some(self.next_token);
        vec![Effect::ScheduleRefresh {
            delay: self.config.debounce,
            token: self.next_token,
        }]
    }

    fn open(&mut self) {
        if self.state.phase == Phase::Closed {
            self.state.phase = Phase::Querying;
        }
    }

    fn close(&mut self) {
        self.state = InteractionState::default();
        self.pending = None;
    }

    /// Re-run the matcher for the current query.
    fn refresh(&mut self) {
        let suggestions = if normalize_query(&self.state.query).is_empty() {
            Vec::new()
        } else {
            self.matches()
        };

        self.state.highlighted = if suggestions.is_empty() { None } else { Some(0) };
        self.state.phase = if suggestions.is_empty() {
            Phase::Querying
        } else {
            Phase::Showing
        };
        self.state.suggestions = suggestions;
    }

    fn matches(&mut self) -> Vec<Suggestion> {
        match &self.index {
            IndexHandle::Loaded(partition) => {
                let results =
                    search_partition(partition, &self.state.query, self.config.max_suggestions);
                debug!(query = %self.state.query, results = results.len(), "suggestions refreshed");
                results.iter().map(Suggestion::from).collect()
            }
            IndexHandle::Unavailable { reason } => {
                if !self.reported_unavailable {
                    warn!(%reason, "search index unavailable; suggestions disabled");
                    self.reported_unavailable = true;
                }
                Vec::new()
            }
        }
    }

    fn move_highlight(&mut self, step: isize) {
        let len = self.state.suggestions.len();
        if len == 0 {
            return;
        }
        let current = self.state.highlighted.unwrap_or(0);
        let next = current.saturating_add_signed(step).min(len - 1);
        self.state.highlighted = Some(next);
    }

    fn activate(&mut self, i: usize) -> Vec<Effect> {
        let Some(suggestion) = self.state.suggestions.get(i) else {
            return Vec::new();
        };
        let link = suggestion.link.clone();
        self.close();
        vec![Effect::Navigate(link)]
    }
}
