//! Artifact round trips through the filesystem.

use std::fs;

use docsift::artifact::{artifact_file_name, MANIFEST_FILE};
use docsift::runtime::load_partition_bytes;
use docsift::{
    load_index, load_partition, search_partition, ArtifactWriter, LoadError, LocaleKey,
    LocalePartition,
};

use super::common::{build_plain, fixture_index, make_page};

#[test]
fn test_written_artifacts_load_into_identical_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index();
    let handles = ArtifactWriter::new(dir.path()).write(&index).unwrap();
    assert_eq!(handles.len(), 2);

    for partition in index.partitions() {
        let handle = load_index(dir.path(), &partition.locale);
        assert_eq!(handle.partition(), Some(partition));
    }
}

#[test]
fn test_loaded_artifact_searches_like_the_built_index() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index();
    ArtifactWriter::new(dir.path()).write(&index).unwrap();

    let root = LocaleKey::root();
    let loaded = load_partition(&dir.path().join(artifact_file_name(&root))).unwrap();
    let built = index.partition(&root).unwrap();

    let links = |partition: &LocalePartition| -> Vec<String> {
        search_partition(partition, "install", 5)
            .iter()
            .map(|r| r.link())
            .collect()
    };
    assert_eq!(links(&loaded), links(built));
}

#[test]
fn test_manifest_lists_every_locale() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path());
    writer.write(&fixture_index()).unwrap();

    assert!(dir.path().join(MANIFEST_FILE).exists());
    let manifest = writer.read_manifest();
    let locales: Vec<_> = manifest.locales.keys().map(LocaleKey::as_str).collect();
    assert_eq!(locales, vec!["/", "/zh/"]);
    assert_eq!(manifest.locales[&LocaleKey::new("zh")].file, "search-index.zh.json");
    assert_eq!(manifest.locales[&LocaleKey::root()].records, 2);
}

#[test]
fn test_partition_write_keeps_other_manifest_entries() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path());
    writer.write(&fixture_index()).unwrap();

    let replacement = build_plain(&[make_page("/only/", "Only", "")]);
    let root = replacement.partition(&LocaleKey::root()).unwrap();
    writer.write_partition(root).unwrap();

    let manifest = writer.read_manifest();
    assert_eq!(manifest.locales.len(), 2);
    assert_eq!(manifest.locales[&LocaleKey::root()].records, 1);
    assert_eq!(manifest.locales[&LocaleKey::new("zh")].records, 2);
}

#[test]
fn test_tampered_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    ArtifactWriter::new(dir.path()).write(&fixture_index()).unwrap();

    let path = dir.path().join(artifact_file_name(&LocaleKey::root()));
    let original = fs::read_to_string(&path).unwrap();
    fs::write(&path, original.replace("Install", "Uninstall")).unwrap();

    assert!(matches!(
        load_partition(&path),
        Err(LoadError::ChecksumMismatch { .. })
    ));

    let handle = load_index(dir.path(), &LocaleKey::root());
    assert!(!handle.is_available());
}

#[test]
fn test_truncated_artifact_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    ArtifactWriter::new(dir.path()).write(&fixture_index()).unwrap();

    let path = dir.path().join(artifact_file_name(&LocaleKey::root()));
    let bytes = fs::read(&path).unwrap();
    assert!(matches!(
        load_partition_bytes(&bytes[..bytes.len() / 2]),
        Err(LoadError::Malformed(_))
    ));
}

#[test]
fn test_missing_artifact_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let handle = load_index(dir.path(), &LocaleKey::new("fr"));
    assert!(!handle.is_available());
    assert!(handle.partition().is_none());
}

#[test]
fn test_failed_write_keeps_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let writer = ArtifactWriter::new(&out);
    writer.write(&fixture_index()).unwrap();
    let before = fs::read(out.join(artifact_file_name(&LocaleKey::root()))).unwrap();

    // A file where the output directory should be makes every write fail.
    let blocked = ArtifactWriter::new(out.join(artifact_file_name(&LocaleKey::root())).join("x"));
    assert!(blocked.write(&fixture_index()).is_err());

    let after = fs::read(out.join(artifact_file_name(&LocaleKey::root()))).unwrap();
    assert_eq!(before, after);
    assert!(load_index(&out, &LocaleKey::root()).is_available());
}
