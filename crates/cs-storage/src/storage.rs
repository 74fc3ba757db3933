//! Content source trait and error types.
//!
//! Provides the core [`ContentSource`] trait for abstracting document listing and
//! retrieval, along with [`StorageError`] for unified error handling across backends.
//!
//! # Key Convention
//!
//! All key parameters are **document keys**, not file names:
//! - `"austin-tx"` - the document stored as `austin-tx.json`
//!
//! Source implementations handle the mapping from keys to their internal
//! storage format (a file in a directory, an entry at the root of an archive).

use std::path::PathBuf;

/// File suffix of every stored document.
pub const DOCUMENT_SUFFIX: &str = ".json";

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Document does not exist.
    NotFound,
    /// Invalid key (empty, or escapes the source root).
    InvalidPath,
    /// Backend could not be opened.
    Unavailable,
    /// Backend or document is unreadable (bad archive, invalid UTF-8).
    Corrupt,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Dir", "Archive", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::InvalidData => StorageErrorKind::Corrupt,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// Whether this error only means the document is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Unavailable => "Unavailable",
            StorageErrorKind::Corrupt => "Corrupt",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Content source abstraction for document listing and retrieval.
///
/// Provides a unified interface for reading JSON documents regardless of
/// whether they live as loose files or inside a packed archive.
///
/// # Keys
///
/// All key parameters are **document keys** without the `.json` suffix.
/// Implementations map keys to their internal storage format.
pub trait ContentSource: Send + Sync {
    /// List the keys of all stored documents.
    ///
    /// Order is the backend's enumeration order. A backend with nothing to
    /// enumerate (missing directory) returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend is unavailable or unreadable.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Read the raw content of a document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or can't be read.
    fn read(&self, key: &str) -> Result<String, StorageError>;

    /// Whether the backend can currently serve documents.
    fn is_available(&self) -> bool;
}

/// Validate that a key names a single document at the source root.
///
/// Rejects empty keys and keys containing path separators or `..` so a key
/// can never escape the source directory.
pub(crate) fn validate_key(key: &str, backend: &'static str) -> Result<(), StorageError> {
    let invalid = key.is_empty() || key.contains(['/', '\\']) || key.contains("..");
    if invalid {
        return Err(StorageError::new(StorageErrorKind::InvalidPath)
            .with_path(key)
            .with_backend(backend));
    }
    Ok(())
}

/// Strip the document suffix from a stored name.
///
/// Returns `None` for names that are not documents or that live below the root.
pub(crate) fn key_from_name(name: &str) -> Option<&str> {
    let key = name.strip_suffix(DOCUMENT_SUFFIX)?;
    if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert!(err.path.as_deref().is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_with_path() {
        let err = StorageError::new(StorageErrorKind::NotFound).with_path("/data/cities");

        assert_eq!(err.path.as_deref(), Some(Path::new("/data/cities")));
    }

    #[test]
    fn test_storage_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound).with_source(io_err);

        assert!(err.downcast_source::<std::io::Error>().is_some());
    }

    #[test]
    fn test_storage_error_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::io(io_err, Some(PathBuf::from("/data/austin-tx.json")));

        assert!(err.is_not_found());
        assert_eq!(err.path.as_deref(), Some(Path::new("/data/austin-tx.json")));
    }

    #[test]
    fn test_storage_error_io_invalid_data() {
        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8");
        let err = StorageError::io(io_err, None);

        assert_eq!(err.kind, StorageErrorKind::Corrupt);
    }

    #[test]
    fn test_storage_error_display_simple() {
        let err = StorageError::new(StorageErrorKind::Unavailable);

        assert_eq!(err.to_string(), "Unavailable");
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Dir")
            .with_path("/data/austin-tx.json")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Dir] Not found: file not found (path: /data/austin-tx.json)"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("austin-tx", "Dir").is_ok());

        for bad in ["", "../etc/passwd", "a/b", "a\\b", ".."] {
            let err = validate_key(bad, "Dir").unwrap_err();
            assert_eq!(err.kind, StorageErrorKind::InvalidPath, "key {bad:?}");
        }
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(key_from_name("austin-tx.json"), Some("austin-tx"));
        assert_eq!(key_from_name("README.md"), None);
        assert_eq!(key_from_name(".json"), None);
        assert_eq!(key_from_name("nested/austin-tx.json"), None);
        assert_eq!(key_from_name(".hidden.json"), None);
    }
}
