//! Directory-backed content source.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{ContentSource, DOCUMENT_SUFFIX, StorageError, key_from_name, validate_key};

const BACKEND: &str = "Dir";

/// Content source reading loose `<key>.json` files from one directory.
///
/// Only files directly inside the directory are considered. A missing
/// directory lists as empty and reports itself unavailable.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory this source reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{DOCUMENT_SUFFIX}"))
    }
}

impl ContentSource for DirSource {
    fn list(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::io(e, Some(self.root.clone())).with_backend(BACKEND));
            }
        };

        let keys = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|e| {
                let name = e.file_name();
                key_from_name(&name.to_string_lossy()).map(str::to_owned)
            })
            .collect();

        Ok(keys)
    }

    fn read(&self, key: &str) -> Result<String, StorageError> {
        validate_key(key, BACKEND)?;
        let path = self.document_path(key);
        fs::read_to_string(&path).map_err(|e| StorageError::io(e, Some(path)).with_backend(BACKEND))
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StorageErrorKind;

    #[test]
    fn test_list_json_files_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("austin-tx.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("dallas-tx.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("README.md"), "# notes").unwrap();
        fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

        let source = DirSource::new(temp_dir.path());
        let mut keys = source.list().unwrap();
        keys.sort();

        assert_eq!(keys, vec!["austin-tx".to_owned(), "dallas-tx".to_owned()]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(temp_dir.path().join("missing"));

        assert!(source.list().unwrap().is_empty());
        assert!(!source.is_available());
    }

    #[test]
    fn test_read_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("austin-tx.json"), r#"{"slug":"austin-tx"}"#).unwrap();

        let source = DirSource::new(temp_dir.path());

        assert!(source.is_available());
        assert_eq!(source.read("austin-tx").unwrap(), r#"{"slug":"austin-tx"}"#);
    }

    #[test]
    fn test_read_missing_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(temp_dir.path());

        let err = source.read("nowhere-zz").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Dir"));
    }

    #[test]
    fn test_read_rejects_traversal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(temp_dir.path());

        let err = source.read("../secrets").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }
}
