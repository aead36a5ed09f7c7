// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Capability parameters for the index builder.
//!
//! Whether a page is searchable and which extra strings it contributes are
//! caller decisions. They come in as plain closures, so the builder never looks
//! at ambient configuration and tests can inject whatever they like.

use std::fmt;
use std::sync::Arc;

use super::Page;
use crate::error::ExtraFieldsError;

/// Decides whether a page enters the index.
pub type SearchableFn = dyn Fn(&Page) -> bool + Send + Sync;

/// Produces extra searchable strings for a page, in the order they should be stored.
pub type ExtraFieldsFn = dyn Fn(&Page) -> Result<Vec<String>, ExtraFieldsError> + Send + Sync;

/// The injected callbacks, cheap to clone and share across rebuild tasks.
#[derive(Clone)]
pub struct IndexOptions {
    is_searchable: Arc<SearchableFn>,
    get_extra_fields: Arc<ExtraFieldsFn>,
}

impl IndexOptions {
    /// Every page searchable, no extra fields.
    pub fn new() -> Self {
        Self {
            is_searchable: Arc::new(|_| true),
            get_extra_fields: Arc::new(|_| Ok(Vec::new())),
        }
    }

    pub fn with_searchable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Page) -> bool + Send + Sync + 'static,
    {
        self.is_searchable = Arc::new(predicate);
        self
    }

    pub fn with_extra_fields<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Page) -> Result<Vec<String>, ExtraFieldsError> + Send + Sync + 'static,
    {
        self.get_extra_fields = Arc::new(callback);
        self
    }

    pub fn is_searchable(&self, page: &Page) -> bool {
        (self.is_searchable)(page)
    }

    pub fn extra_fields(&self) -> &ExtraFieldsFn {
        self.get_extra_fields.as_ref()
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IndexOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexOptions").finish_non_exhaustive()
    }
}
