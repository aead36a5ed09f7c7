// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime side: loading artifacts and holding the active index.
//!
//! The query path never sees a `Result`. Loading can fail (missing file, bad
//! checksum, an artifact from a newer indexer), and when it does the failure is
//! folded into [`IndexHandle::Unavailable`]. The interaction controller treats
//! that as "no suggestions, ever" and keeps the search box usable.
//!
//! The loaded partition is behind an `Arc` and is never mutated. A rebuild
//! produces a new partition, and the holder swaps the whole handle.

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::artifact::{artifact_file_name, decode_partition};
use crate::error::LoadError;
use crate::types::{LocaleKey, LocalePartition};

/// The index the runtime searches against.
#[derive(Debug, Clone)]
pub enum IndexHandle {
    Loaded(Arc<LocalePartition>),
    Unavailable { reason: String },
}

impl IndexHandle {
    pub fn loaded(partition: LocalePartition) -> Self {
        IndexHandle::Loaded(Arc::new(partition))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        IndexHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn partition(&self) -> Option<&LocalePartition> {
        match self {
            IndexHandle::Loaded(partition) => Some(partition),
            IndexHandle::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, IndexHandle::Loaded(_))
    }

    /// From a load result. Failures become `Unavailable` with the error text.
    pub fn from_load(result: Result<LocalePartition, LoadError>) -> Self {
        match result {
            Ok(partition) => Self::loaded(partition),
            Err(err) => Self::unavailable(err.to_string()),
        }
    }
}

impl From<LocalePartition> for IndexHandle {
    fn from(partition: LocalePartition) -> Self {
        IndexHandle::loaded(partition)
    }
}

/// Decode an artifact already in memory (fetched by the browser, say).
pub fn load_partition_bytes(bytes: &[u8]) -> Result<LocalePartition, LoadError> {
    decode_partition(bytes)
}

/// Read and verify one artifact file.
pub fn load_partition(path: &Path) -> Result<LocalePartition, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let partition = decode_partition(&bytes)?;
    debug!(
        path = %path.display(),
        locale = %partition.locale,
        records = partition.len(),
        "artifact loaded"
    );
    Ok(partition)
}

/// Load the artifact for `locale` from an output directory. Never fails: a load
/// error is logged and becomes an unavailable handle.
pub fn load_index(dir: &Path, locale: &LocaleKey) -> IndexHandle {
    let path = dir.join(artifact_file_name(locale));
    match load_partition(&path) {
        Ok(partition) => IndexHandle::loaded(partition),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "search index unavailable");
            IndexHandle::unavailable(err.to_string())
        }
    }
}
