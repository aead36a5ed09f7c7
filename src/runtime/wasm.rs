// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WebAssembly bindings for the search box.
//!
//! The page owns the DOM and the timers; this module owns the state. The page
//! fetches the artifact for its locale, hands the bytes to `loadIndex`, and
//! forwards keyboard and pointer events to `handle`, which returns the effects
//! to carry out.
//!
//! ```js
//! const box = new SearchBox({ hotKeys: ["s", "/"], maxSuggestions: 5 });
//! box.loadIndex(new Uint8Array(await (await fetch(url)).arrayBuffer()));
//!
//! document.addEventListener("keydown", (e) => {
//!     for (const effect of box.handle({ type: "hotKey", key: e.key, ctrl: e.ctrlKey, ... })) {
//!         if (effect.type === "focusInput") input.focus();
//!         if (effect.type === "preventDefault") e.preventDefault();
//!     }
//!     render(box.state());
//! });
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

use super::{load_partition_bytes, IndexHandle};
use crate::config::{LocaleResolver, SearchConfig};
use crate::interaction::{Effect, Event, KeyPress, Phase, SearchController};
use crate::search::Suggestion;

/// Events as the page sends them.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum JsEvent {
    HotKey {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        in_editable: bool,
    },
    Focus,
    Blur,
    Input {
        value: String,
    },
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Hover {
        index: usize,
    },
    Select {
        index: usize,
    },
    Tick {
        token: u64,
    },
}

impl From<JsEvent> for Event {
    fn from(event: JsEvent) -> Self {
        match event {
            JsEvent::HotKey {
                key,
                ctrl,
                meta,
                shift,
                alt,
                in_editable,
            } => Event::HotKey(KeyPress {
                key,
                ctrl,
                meta,
                shift,
                alt,
                in_editable,
            }),
            JsEvent::Focus => Event::Focus,
            JsEvent::Blur => Event::Blur,
            JsEvent::Input { value } => Event::Input(value),
            JsEvent::ArrowDown => Event::ArrowDown,
            JsEvent::ArrowUp => Event::ArrowUp,
            JsEvent::Enter => Event::Enter,
            JsEvent::Escape => Event::Escape,
            JsEvent::Hover { index } => Event::Hover(index),
            JsEvent::Select { index } => Event::Select(index),
            JsEvent::Tick { token } => Event::Tick(token),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum JsEffect {
    FocusInput,
    PreventDefault,
    Navigate { link: String },
    ScheduleRefresh { delay_ms: u64, token: u64 },
}

impl From<Effect> for JsEffect {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::FocusInput => JsEffect::FocusInput,
            Effect::PreventDefault => JsEffect::PreventDefault,
            Effect::Navigate(link) => JsEffect::Navigate { link },
            Effect::ScheduleRefresh { delay, token } => JsEffect::ScheduleRefresh {
                delay_ms: duration_ms(delay),
                token,
            },
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsState<'a> {
    open: bool,
    showing: bool,
    query: &'a str,
    suggestions: &'a [Suggestion],
    highlighted: Option<usize>,
    index_available: bool,
}

/// One search box.
#[wasm_bindgen]
pub struct SearchBox {
    controller: SearchController,
    locales: LocaleResolver,
}

#[wasm_bindgen]
impl SearchBox {
    /// `config` is the same object as the JSON config file (or `undefined`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SearchBox, JsValue> {
        let config: SearchConfig = if config.is_undefined() || config.is_null() {
            SearchConfig::default()
        } else {
            from_value(config).map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(SearchBox {
            controller: SearchController::new(
                config.controller_config(),
                IndexHandle::unavailable("index not loaded"),
            ),
            locales: config.locale_resolver(),
        })
    }

    /// Swap in a fetched artifact. A bad artifact leaves the box usable with no
    /// suggestions; returns whether the index is now available.
    #[wasm_bindgen(js_name = "loadIndex")]
    pub fn load_index(&mut self, bytes: &[u8]) -> bool {
        let handle = IndexHandle::from_load(load_partition_bytes(bytes));
        let available = handle.is_available();
        self.controller.replace_index(handle);
        available
    }

    /// Locale prefix for a route, to pick which artifact to fetch.
    #[wasm_bindgen(js_name = "localeFor")]
    pub fn locale_for(&self, route: &str) -> String {
        self.locales.resolve(route).as_str().to_string()
    }

    /// Placeholder text configured for the route's locale.
    pub fn placeholder(&self, route: &str) -> Option<String> {
        self.locales.placeholder(route).map(str::to_string)
    }

    /// Feed one event, get back the effects to perform.
    pub fn handle(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: JsEvent =
            from_value(event).map_err(|e| JsValue::from_str(&format!("Invalid event: {}", e)))?;
        let effects: Vec<JsEffect> = self
            .controller
            .handle(event.into())
            .into_iter()
            .map(JsEffect::from)
            .collect();
        to_value(&effects).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Snapshot for rendering.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.controller.state();
        let snapshot = JsState {
            open: state.is_open(),
            showing: state.phase == Phase::Showing,
            query: &state.query,
            suggestions: &state.suggestions,
            highlighted: state.highlighted,
            index_available: self.controller.index().is_available(),
        };
        to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
