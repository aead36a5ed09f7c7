// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index artifacts: one file per locale, written atomically.
//!
//! Each partition is encoded in memory first, then written to a temporary file in
//! the output directory, synced, and renamed over the target. A rename within one
//! directory is atomic, so readers see either the old artifact or the new one,
//! never half of each. If anything fails before the rename, the temp file is
//! dropped (and deleted) and the previous artifact is left alone.
//!
//! `manifest.json` maps locales to their files. It's rewritten the same way,
//! read-modify-write under a lock so concurrent locale rebuilds don't drop each
//! other's entries.

pub mod format;

pub use format::{
    artifact_file_name, compute_crc32, decode_partition, encode_partition, EncodedArtifact,
    ARTIFACT_FORMAT, ARTIFACT_VERSION, MANIFEST_FILE,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::LocaleKey;

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub file: String,
    pub checksum: u32,
    pub records: usize,
}

/// `manifest.json`: locale → artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub locales: BTreeMap<LocaleKey, ManifestEntry>,
}

#[cfg(feature = "indexer")]
mod writer;

#[cfg(feature = "indexer")]
pub use writer::{ArtifactHandle, ArtifactWriter};
