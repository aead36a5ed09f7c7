// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Hotkey matching.
//!
//! Keys are compared by their `event.key` value, case-insensitively, so `"s"`
//! matches both `s` and `S`. A hotkey configured as a bare string matches on the
//! key alone. One configured as an object also requires the modifier flags to
//! match exactly (an omitted flag means "not held").

use serde::{Deserialize, Serialize};

/// A key press as reported by the UI layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    /// The key was typed into an input, textarea, select or contenteditable.
    pub in_editable: bool,
}

impl KeyPress {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn in_editable(mut self) -> Self {
        self.in_editable = true;
        self
    }
}

/// Modifier flags a hotkey requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

/// A hotkey as written in configuration: `"s"` or `{ "key": "k", "ctrl": true }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HotKeySpec {
    Key(String),
    Options {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
}

/// A resolved hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotKey {
    pub key: String,
    /// `None` for bare-key hotkeys: modifiers are not checked.
    pub modifiers: Option<Modifiers>,
}

impl HotKey {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: None,
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers: Some(modifiers),
        }
    }

    pub fn matches(&self, press: &KeyPress) -> bool {
        if !press.key.eq_ignore_ascii_case(&self.key) {
            return false;
        }
        match self.modifiers {
            None => true,
            Some(required) => {
                required.ctrl == press.ctrl
                    && required.meta == press.meta
                    && required.shift == press.shift
                    && required.alt == press.alt
            }
        }
    }
}

impl From<HotKeySpec> for HotKey {
    fn from(spec: HotKeySpec) -> Self {
        match spec {
            HotKeySpec::Key(key) => HotKey::key(key),
            HotKeySpec::Options { key, modifiers } => HotKey::with_modifiers(key, modifiers),
        }
    }
}

impl From<&HotKeySpec> for HotKey {
    fn from(spec: &HotKeySpec) -> Self {
        HotKey::from(spec.clone())
    }
}

/// `["s", "/"]`
pub fn default_hot_keys() -> Vec<HotKeySpec> {
    vec![HotKeySpec::Key("s".into()), HotKeySpec::Key("/".into())]
}
