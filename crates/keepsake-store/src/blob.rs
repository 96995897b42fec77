//! Durable blob I/O for the persistent store.
//!
//! A blob is the on-disk serialized representation of the full
//! name -> value mapping, written wholesale (not incrementally). Writes
//! go through a temporary sibling file followed by a rename, so a crash
//! mid-write never leaves the target truncated or corrupt.

use keepsake_common::{BlobError, Mapping};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Durable key/value blob I/O.
///
/// Behind a trait so the store can be exercised against failure modes
/// without a real filesystem underneath.
pub trait BlobStore: Send + Sync {
    /// Read and parse the blob at `path`.
    ///
    /// A missing file is [`BlobError::NotFound`]; a file that exists but
    /// does not parse is [`BlobError::Parse`].
    fn read_mapping(&self, path: &Path) -> Result<Mapping, BlobError>;

    /// Write the full mapping to `path`, atomically from the caller's
    /// perspective.
    fn write_mapping(&self, path: &Path, mapping: &Mapping) -> Result<(), BlobError>;

    /// Delete the blob at `path`. A missing file is [`BlobError::NotFound`].
    fn delete(&self, path: &Path) -> Result<(), BlobError>;
}

/// JSON-on-filesystem blob store.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonBlobStore;

impl JsonBlobStore {
    pub fn new() -> Self {
        Self
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl BlobStore for JsonBlobStore {
    fn read_mapping(&self, path: &Path) -> Result<Mapping, BlobError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(BlobError::NotFound),
            Err(e) => return Err(BlobError::Io(e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_mapping(&self, path: &Path, mapping: &Mapping) -> Result<(), BlobError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec(mapping)?;
        // Write-then-rename keeps the previous blob intact on crash.
        let tmp = Self::tmp_path(path);
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<(), BlobError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::NotFound),
            Err(e) => Err(BlobError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let blob = JsonBlobStore::new();

        let mut mapping = Mapping::new();
        mapping.insert("a".to_string(), json!(1));
        mapping.insert("b".to_string(), json!({"nested": [true, null]}));

        blob.write_mapping(&path, &mapping).unwrap();
        let loaded = blob.read_mapping(&path).unwrap();
        assert_eq!(loaded, mapping);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let blob = JsonBlobStore::new();

        assert!(matches!(
            blob.read_mapping(&path),
            Err(BlobError::NotFound)
        ));
    }

    #[test]
    fn test_read_corrupt_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{not json").unwrap();

        let blob = JsonBlobStore::new();
        assert!(matches!(blob.read_mapping(&path), Err(BlobError::Parse(_))));
    }

    #[test]
    fn test_write_creates_parent_dirs_and_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deep/nested/state.json");
        let blob = JsonBlobStore::new();

        let mut mapping = Mapping::new();
        mapping.insert("k".to_string(), json!("v"));
        blob.write_mapping(&path, &mapping).unwrap();

        assert!(path.exists());
        assert!(!JsonBlobStore::tmp_path(&path).exists());
    }

    #[test]
    fn test_write_replaces_existing_blob() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let blob = JsonBlobStore::new();

        let mut first = Mapping::new();
        first.insert("a".to_string(), json!(1));
        blob.write_mapping(&path, &first).unwrap();

        let mut second = Mapping::new();
        second.insert("a".to_string(), json!(2));
        blob.write_mapping(&path, &second).unwrap();

        assert_eq!(blob.read_mapping(&path).unwrap(), second);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let blob = JsonBlobStore::new();

        assert!(matches!(blob.delete(&path), Err(BlobError::NotFound)));
    }

    #[test]
    fn test_delete_removes_blob() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let blob = JsonBlobStore::new();

        blob.write_mapping(&path, &Mapping::new()).unwrap();
        blob.delete(&path).unwrap();
        assert!(!path.exists());
    }
}
