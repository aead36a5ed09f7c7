// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types, one enum per concern.
//!
//! How far each one travels:
//!
//! | Error                   | Scope        | Handling                                  |
//! |-------------------------|--------------|-------------------------------------------|
//! | `ExtraFieldsError`      | one page     | page indexed with no extra fields, logged |
//! | `BuildError`            | one locale   | that partition's build fails loudly       |
//! | `ArtifactError`         | one locale   | previous artifact stays in place          |
//! | `LoadError`             | runtime      | search degrades to "no suggestions"       |
//! | `SourceError`           | one rebuild  | rebuild fails, scheduler keeps running    |
//! | `ConfigError`           | startup      | CLI exits non-zero                        |
//!
//! Query matching has no error type: it's pure string comparison.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::LocaleKey;

/// An extra-fields callback could not produce fields for a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtraFieldsError {
    pub message: String,
}

impl ExtraFieldsError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-page diagnostic: extraction continued without extra fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("extra fields unavailable for page {path}: {source}")]
pub struct ExtractionFieldError {
    pub path: String,
    #[source]
    pub source: ExtraFieldsError,
}

/// Aggregation failed; the partition is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("page path {path} appears more than once in locale {locale}")]
    DuplicatePath { locale: LocaleKey, path: String },

    #[error("page in locale {locale} has an empty path")]
    EmptyPath { locale: LocaleKey },
}

/// Reading page data from its source failed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid page data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to walk {}: {message}", root.display())]
    Walk { root: PathBuf, message: String },
}

/// Serializing or swapping an artifact failed. The previous artifact is intact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to encode artifact for locale {locale}: {source}")]
    Encode {
        locale: LocaleKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to swap artifact into {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An artifact could not be loaded at runtime.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported artifact format {format} v{version}")]
    UnsupportedFormat { format: String, version: u32 },

    #[error("artifact checksum mismatch: expected {expected:08x}, found {actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Configuration could not be read or is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A scheduled partition rebuild failed.
#[derive(Debug, Error)]
pub enum RebuildError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("rebuild task aborted: {0}")]
    Aborted(String),
}
