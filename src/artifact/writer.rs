use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::format::{artifact_file_name, encode_partition, ARTIFACT_VERSION, MANIFEST_FILE};
use super::{ArtifactManifest, ManifestEntry};
use crate::error::ArtifactError;
use crate::types::{Index, LocaleKey, LocalePartition};

/// Where one locale's artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    pub locale: LocaleKey,
    pub path: PathBuf,
    pub checksum: u32,
    pub records: usize,
    pub bytes: usize,
}

/// Writes artifacts into one output directory.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
    manifest_lock: Mutex<()>,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            manifest_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the artifact for `locale` is (or will be) written to.
    pub fn artifact_path(&self, locale: &LocaleKey) -> PathBuf {
        self.dir.join(artifact_file_name(locale))
    }

    /// Write every partition, then the manifest.
    ///
    /// Partitions are independent: a failure stops the loop, but artifacts already
    /// swapped in stay valid and unwritten ones keep their previous contents.
    pub fn write(&self, index: &Index) -> Result<Vec<ArtifactHandle>, ArtifactError> {
        let handles = index
            .partitions()
            .map(|partition| self.write_artifact(partition))
            .collect::<Result<Vec<_>, _>>()?;

        self.update_manifest(&handles)?;
        info!(
            dir = %self.dir.display(),
            artifacts = handles.len(),
            "search index artifacts written"
        );
        Ok(handles)
    }

    /// Write one partition and record it in the manifest.
    pub fn write_partition(
        &self,
        partition: &LocalePartition,
    ) -> Result<ArtifactHandle, ArtifactError> {
        let handle = self.write_artifact(partition)?;
        self.update_manifest(std::slice::from_ref(&handle))?;
        Ok(handle)
    }

    /// Read the current manifest (empty if there isn't one yet or it's unreadable).
    pub fn read_manifest(&self) -> ArtifactManifest {
        let path = self.dir.join(MANIFEST_FILE);
        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable manifest");
                ArtifactManifest::default()
            }),
            Err(_) => ArtifactManifest::default(),
        }
    }

    fn write_artifact(&self, partition: &LocalePartition) -> Result<ArtifactHandle, ArtifactError> {
        let encoded = encode_partition(partition).map_err(|source| ArtifactError::Encode {
            locale: partition.locale.clone(),
            source,
        })?;
        let path = self.artifact_path(&partition.locale);
        self.swap_in(&path, &encoded.bytes)?;

        debug!(
            locale = %partition.locale,
            path = %path.display(),
            records = encoded.records,
            "artifact swapped in"
        );
        Ok(ArtifactHandle {
            locale: partition.locale.clone(),
            path,
            checksum: encoded.checksum,
            records: encoded.records,
            bytes: encoded.bytes.len(),
        })
    }

    fn update_manifest(&self, handles: &[ArtifactHandle]) -> Result<(), ArtifactError> {
        let _guard = self.manifest_lock.lock();

        let mut manifest = self.read_manifest();
        manifest.version = ARTIFACT_VERSION;
        for handle in handles {
            manifest.locales.insert(
                handle.locale.clone(),
                ManifestEntry {
                    file: artifact_file_name(&handle.locale),
                    checksum: handle.checksum,
                    records: handle.records,
                },
            );
        }

        let path = self.dir.join(MANIFEST_FILE);
        let bytes = serde_json::to_vec_pretty(&manifest).map_err(|source| {
            ArtifactError::Encode {
                locale: LocaleKey::root(),
                source,
            }
        })?;
        self.swap_in(&path, &bytes)
    }

    /// Temp file in the same directory, fsync, rename over `target`.
    fn swap_in(&self, target: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let io_err = |source| ArtifactError::Io {
            path: target.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        tmp.persist(target).map_err(|e| ArtifactError::Persist {
            path: target.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}
