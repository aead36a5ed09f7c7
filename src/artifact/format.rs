// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Artifact encoding.
//!
//! An artifact is one locale partition wrapped in a small JSON envelope:
//!
//! ```text
//! {
//!   "format":   "docsift-index",
//!   "version":  1,
//!   "locale":   "/zh/",
//!   "checksum": 2868792411,        // CRC32 of the raw `records` bytes
//!   "records":  [ ... ]            // SearchableRecord, in partition order
//! }
//! ```
//!
//! JSON keeps it self-describing and order-preserving, and the browser can parse
//! it without any of our code. The checksum is computed over the exact bytes of
//! the `records` array as written, so a truncated or hand-edited file is caught
//! before anything is searched.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::LoadError;
use crate::types::{LocaleKey, LocalePartition, SearchableRecord};

/// Format tag in every artifact.
pub const ARTIFACT_FORMAT: &str = "docsift-index";

/// Current envelope version.
pub const ARTIFACT_VERSION: u32 = 1;

/// Name of the per-directory manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// `search-index.<slug>.json`
pub fn artifact_file_name(locale: &LocaleKey) -> String {
    format!("search-index.{}.json", locale.slug())
}

/// CRC32 over raw bytes.
pub fn compute_crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    format: &'a str,
    version: u32,
    locale: &'a LocaleKey,
    checksum: u32,
    records: &'a RawValue,
}

#[derive(Deserialize)]
struct EnvelopeIn<'a> {
    format: String,
    version: u32,
    locale: LocaleKey,
    checksum: u32,
    #[serde(borrow)]
    records: &'a RawValue,
}

/// An encoded partition, ready to be written.
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    pub bytes: Vec<u8>,
    pub checksum: u32,
    pub records: usize,
}

/// Encode a partition. Entirely in memory: nothing touches disk until this succeeds.
pub fn encode_partition(partition: &LocalePartition) -> serde_json::Result<EncodedArtifact> {
    let records_json = serde_json::to_string(&partition.records)?;
    let checksum = compute_crc32(records_json.as_bytes());
    let records = RawValue::from_string(records_json)?;

    let bytes = serde_json::to_vec(&EnvelopeOut {
        format: ARTIFACT_FORMAT,
        version: ARTIFACT_VERSION,
        locale: &partition.locale,
        checksum,
        records: &records,
    })?;

    Ok(EncodedArtifact {
        bytes,
        checksum,
        records: partition.records.len(),
    })
}

/// Decode and verify an artifact.
pub fn decode_partition(bytes: &[u8]) -> Result<LocalePartition, LoadError> {
    let envelope: EnvelopeIn<'_> = serde_json::from_slice(bytes)?;

    if envelope.format != ARTIFACT_FORMAT || envelope.version != ARTIFACT_VERSION {
        return Err(LoadError::UnsupportedFormat {
            format: envelope.format,
            version: envelope.version,
        });
    }

    let actual = compute_crc32(envelope.records.get().as_bytes());
    if actual != envelope.checksum {
        return Err(LoadError::ChecksumMismatch {
            expected: envelope.checksum,
            actual,
        });
    }

    let records: Vec<SearchableRecord> = serde_json::from_str(envelope.records.get())?;
    Ok(LocalePartition {
        locale: envelope.locale,
        records,
    })
}
