// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Configuration file.
//!
//! One JSON document (camelCase keys) configures both halves: the indexer reads
//! `searchable` and `extraFields`, the runtime reads `locales`, `hotKeys`,
//! `maxSuggestions` and `debounceMs`. Every key is optional.
//!
//! ```json
//! {
//!   "locales": { "/": { "placeholder": "Search" }, "/zh/": { "placeholder": "搜索" } },
//!   "hotKeys": ["s", "/", { "key": "k", "ctrl": true }],
//!   "maxSuggestions": 5,
//!   "debounceMs": 0,
//!   "searchable": { "excludePaths": ["/drafts/"], "excludeTitles": ["Draft"] },
//!   "extraFields": ["tags"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::build::{IndexOptions, Page};
use crate::error::{ConfigError, ExtraFieldsError};
use crate::interaction::hotkey::{default_hot_keys, HotKey, HotKeySpec};
use crate::interaction::ControllerConfig;
use crate::types::LocaleKey;

/// Default suggestion window size.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Frontmatter flag that keeps a page out of the index.
pub const SEARCH_FLAG: &str = "search";

/// Per-locale UI strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocaleOptions {
    pub placeholder: Option<String>,
}

/// Declarative searchable predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchableRules {
    /// Route prefixes to leave out.
    pub exclude_paths: Vec<String>,
    /// Title prefixes to leave out.
    pub exclude_titles: Vec<String>,
}

impl SearchableRules {
    pub fn allows(&self, page: &Page) -> bool {
        if page.frontmatter.get(SEARCH_FLAG) == Some(&Value::Bool(false)) {
            return false;
        }
        let path_excluded = self
            .exclude_paths
            .iter()
            .any(|prefix| page.path.starts_with(prefix.as_str()));
        let title_excluded = self
            .exclude_titles
            .iter()
            .any(|prefix| page.title.starts_with(prefix.as_str()));
        !(path_excluded || title_excluded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub locales: BTreeMap<String, LocaleOptions>,
    pub hot_keys: Vec<HotKeySpec>,
    pub max_suggestions: usize,
    pub debounce_ms: u64,
    pub searchable: SearchableRules,
    /// Frontmatter keys whose values become extra searchable fields.
    pub extra_fields: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            locales: BTreeMap::new(),
            hot_keys: default_hot_keys(),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            debounce_ms: 0,
            searchable: SearchableRules::default(),
            extra_fields: Vec::new(),
        }
    }
}

impl SearchConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_suggestions == 0 {
            return Err(ConfigError::Invalid(
                "maxSuggestions must be a positive integer".to_string(),
            ));
        }
        if let Some(spec) = self.hot_keys.iter().find(|spec| hot_key_name(spec).is_empty()) {
            return Err(ConfigError::Invalid(format!("empty hotkey: {:?}", spec)));
        }
        Ok(())
    }

    /// Builder callbacks for the configured rules.
    pub fn index_options(&self) -> IndexOptions {
        let rules = self.searchable.clone();
        let keys = self.extra_fields.clone();
        IndexOptions::new()
            .with_searchable(move |page| rules.allows(page))
            .with_extra_fields(move |page| frontmatter_fields(page, &keys))
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            hot_keys: self.hot_keys.iter().map(HotKey::from).collect(),
            max_suggestions: self.max_suggestions,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    pub fn locale_resolver(&self) -> LocaleResolver {
        LocaleResolver::new(
            self.locales
                .iter()
                .map(|(prefix, options)| (LocaleKey::new(prefix), options.clone())),
        )
    }
}

fn hot_key_name(spec: &HotKeySpec) -> &str {
    match spec {
        HotKeySpec::Key(key) | HotKeySpec::Options { key, .. } => key,
    }
}

/// Extra fields from frontmatter: strings as-is, string arrays flattened, in key order.
pub fn frontmatter_fields(page: &Page, keys: &[String]) -> Result<Vec<String>, ExtraFieldsError> {
    let mut fields = Vec::new();
    for key in keys {
        match page.frontmatter.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(value)) => fields.push(value.clone()),
            Some(Value::Array(items)) => {
                for item in items {
                    match item {
                        Value::String(value) => fields.push(value.clone()),
                        other => {
                            return Err(ExtraFieldsError::new(format!(
                                "frontmatter `{}` contains a non-string item: {}",
                                key, other
                            )))
                        }
                    }
                }
            }
            Some(other) => {
                return Err(ExtraFieldsError::new(format!(
                    "frontmatter `{}` must be a string or an array of strings, got {}",
                    key, other
                )))
            }
        }
    }
    Ok(fields)
}

// =============================================================================
// LOCALE RESOLUTION
// =============================================================================

/// Maps a route to its configured locale, by longest matching prefix.
#[derive(Debug, Clone, Default)]
pub struct LocaleResolver {
    /// Longest prefix first.
    locales: Vec<(LocaleKey, LocaleOptions)>,
}

impl LocaleResolver {
    pub fn new(locales: impl IntoIterator<Item = (LocaleKey, LocaleOptions)>) -> Self {
        let mut locales: Vec<_> = locales.into_iter().collect();
        locales.sort_by(|(a, _), (b, _)| {
            b.as_str()
                .len()
                .cmp(&a.as_str().len())
                .then_with(|| a.cmp(b))
        });
        Self { locales }
    }

    /// Locale for `route`. Falls back to `/`.
    pub fn resolve(&self, route: &str) -> LocaleKey {
        self.locales
            .iter()
            .find(|(locale, _)| locale.contains_route(route))
            .map(|(locale, _)| locale.clone())
            .unwrap_or_default()
    }

    /// Placeholder text for the locale `route` belongs to.
    pub fn placeholder(&self, route: &str) -> Option<&str> {
        let locale = self.resolve(route);
        self.locales
            .iter()
            .find(|(key, _)| *key == locale)
            .and_then(|(_, options)| options.placeholder.as_deref())
    }
}
