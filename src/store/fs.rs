// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! Filesystem-backed object store.
//!
//! Each object name maps directly to a file path under the store root, and
//! its metadata lives in a `<name>.meta.json` sidecar next to the blob:
//!
//! ```text
//! {root}/
//!   {device_id}/
//!     attach/
//!       {hash}            # encrypted attachment bytes
//!       {hash}.meta.json  # content_type, plain_hash, salt
//!     prov/
//!       {hash}
//!       {hash}.meta.json
//! ```
//!
//! Writes go through a temp file plus rename so a crashed process never
//! leaves a half-written blob under a valid name. Object names are generated
//! by the provenance service (decimal device id, fixed class segment, hex
//! digest) and never contain path-traversal components.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ObjectMetadata, ObjectStore, StoreError, StoreResult};

const META_SUFFIX: &str = ".meta.json";
const TMP_SUFFIX: &str = ".tmp";

/// Durable [`ObjectStore`] rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{META_SUFFIX}"))
    }

    /// Write `data` to `path` via a temp file and atomic rename.
    fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, path)
    }

    fn map_read_error(name: &str, err: io::Error) -> StoreError {
        if err.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(name.to_string())
        } else {
            StoreError::Io(err)
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, name: &str, data: &[u8], metadata: &ObjectMetadata) -> StoreResult<()> {
        let meta_json = serde_json::to_vec(metadata)
            .map_err(|e| StoreError::Metadata(e.to_string()))?;
        Self::write_atomic(&self.blob_path(name), data)?;
        Self::write_atomic(&self.meta_path(name), &meta_json)?;
        Ok(())
    }

    fn get(&self, name: &str) -> StoreResult<Vec<u8>> {
        fs::read(self.blob_path(name)).map_err(|e| Self::map_read_error(name, e))
    }

    fn metadata(&self, name: &str) -> StoreResult<ObjectMetadata> {
        if !self.exists(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        match fs::read(self.meta_path(name)) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Metadata(format!("{name}: {e}"))),
            // Blob present but sidecar missing: surface empty metadata and
            // let the caller decide which absences are fatal.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ObjectMetadata::default()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let (dir_part, file_prefix) = match prefix.rsplit_once('/') {
            Some((dir, rest)) => (dir, rest),
            None => ("", prefix),
        };
        let dir = self.root.join(dir_part);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            // Sidecars and interrupted writes are not objects.
            if file_name.ends_with(META_SUFFIX) || file_name.ends_with(TMP_SUFFIX) {
                continue;
            }
            if file_name.starts_with(file_prefix) {
                if dir_part.is_empty() {
                    names.push(file_name);
                } else {
                    names.push(format!("{dir_part}/{file_name}"));
                }
            }
        }
        Ok(names)
    }

    fn exists(&self, name: &str) -> bool {
        self.blob_path(name).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FsObjectStore::new(dir.path());
        (dir, store)
    }

    fn meta() -> ObjectMetadata {
        ObjectMetadata {
            content_type: Some("image/png".into()),
            plain_hash: Some("ab".repeat(32)),
            salt: Some("cd".repeat(16)),
        }
    }

    #[test]
    fn put_then_get_returns_bytes_and_metadata() {
        let (_dir, store) = test_store();
        store.put("42/attach/deadbeef", b"ciphertext", &meta()).unwrap();

        assert_eq!(store.get("42/attach/deadbeef").unwrap(), b"ciphertext");
        assert_eq!(store.metadata("42/attach/deadbeef").unwrap(), meta());
        assert!(store.exists("42/attach/deadbeef"));
    }

    #[test]
    fn sidecar_file_sits_next_to_blob() {
        let (dir, store) = test_store();
        store.put("7/prov/cafe", b"x", &meta()).unwrap();

        assert!(dir.path().join("7/prov/cafe").is_file());
        assert!(dir.path().join("7/prov/cafe.meta.json").is_file());
    }

    #[test]
    fn get_missing_object_is_not_found() {
        let (_dir, store) = test_store();
        assert!(matches!(
            store.get("1/attach/missing"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.metadata("1/attach/missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn missing_sidecar_yields_empty_metadata() {
        let (dir, store) = test_store();
        store.put("1/attach/abc", b"x", &meta()).unwrap();
        fs::remove_file(dir.path().join("1/attach/abc.meta.json")).unwrap();

        assert_eq!(store.metadata("1/attach/abc").unwrap(), ObjectMetadata::default());
    }

    #[test]
    fn corrupt_sidecar_is_a_metadata_error() {
        let (dir, store) = test_store();
        store.put("1/attach/abc", b"x", &meta()).unwrap();
        fs::write(dir.path().join("1/attach/abc.meta.json"), b"not json").unwrap();

        assert!(matches!(
            store.metadata("1/attach/abc"),
            Err(StoreError::Metadata(_))
        ));
    }

    #[test]
    fn list_returns_only_objects_under_prefix() {
        let (_dir, store) = test_store();
        store.put("1/prov/aaa", b"a", &meta()).unwrap();
        store.put("1/prov/bbb", b"b", &meta()).unwrap();
        store.put("1/attach/ccc", b"c", &meta()).unwrap();
        store.put("2/prov/ddd", b"d", &meta()).unwrap();

        let mut names = store.list("1/prov/").unwrap();
        names.sort();
        assert_eq!(names, vec!["1/prov/aaa", "1/prov/bbb"]);
    }

    #[test]
    fn list_skips_sidecars_and_temp_files() {
        let (dir, store) = test_store();
        store.put("1/prov/aaa", b"a", &meta()).unwrap();
        fs::write(dir.path().join("1/prov/leftover.tmp"), b"junk").unwrap();

        assert_eq!(store.list("1/prov/").unwrap(), vec!["1/prov/aaa"]);
    }

    #[test]
    fn list_of_unwritten_namespace_is_empty() {
        let (_dir, store) = test_store();
        assert!(store.list("12345/prov/").unwrap().is_empty());
    }

    #[test]
    fn rewriting_same_name_keeps_single_object() {
        let (_dir, store) = test_store();
        store.put("1/attach/abc", b"same-bytes", &meta()).unwrap();
        store.put("1/attach/abc", b"same-bytes", &meta()).unwrap();

        assert_eq!(store.list("1/attach/").unwrap().len(), 1);
        assert_eq!(store.get("1/attach/abc").unwrap(), b"same-bytes");
    }
}
