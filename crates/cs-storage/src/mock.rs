//! Mock content source for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::sync::RwLock;

use crate::storage::{ContentSource, StorageError, StorageErrorKind, validate_key};

const BACKEND: &str = "Mock";

/// Mock content source for testing.
///
/// Stores documents in memory in insertion order. Use the builder methods
/// to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use cs_storage::{ContentSource, MockSource};
///
/// let source = MockSource::new().with_entry("austin-tx", r#"{"slug":"austin-tx"}"#);
///
/// let keys = source.list().unwrap();
/// let json = source.read("austin-tx").unwrap();
/// ```
#[derive(Debug)]
pub struct MockSource {
    entries: RwLock<Vec<(String, String)>>,
    available: bool,
}

impl Default for MockSource {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            available: true,
        }
    }
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that behaves like a backend that failed to open.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Add a document, replacing any existing one with the same key.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(key, content);
        self
    }

    /// Add or replace a document on a shared source.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, key: impl Into<String>, content: impl Into<String>) {
        let key = key.into();
        let content = content.into();
        let mut entries = self.entries.write().unwrap();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = content,
            None => entries.push((key, content)),
        }
    }

    fn unavailable_error(&self) -> StorageError {
        StorageError::new(StorageErrorKind::Unavailable).with_backend(BACKEND)
    }
}

impl ContentSource for MockSource {
    fn list(&self) -> Result<Vec<String>, StorageError> {
        if !self.available {
            return Err(self.unavailable_error());
        }
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn read(&self, key: &str) -> Result<String, StorageError> {
        validate_key(key, BACKEND)?;
        if !self.available {
            return Err(self.unavailable_error());
        }
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StorageError::not_found(key).with_backend(BACKEND))
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_source_is_send_sync() {
        assert_send_sync::<MockSource>();
    }

    #[test]
    fn test_new_empty() {
        let source = MockSource::new();

        assert!(source.list().unwrap().is_empty());
        assert!(source.is_available());
    }

    #[test]
    fn test_list_in_insertion_order() {
        let source = MockSource::new()
            .with_entry("dallas-tx", "{}")
            .with_entry("austin-tx", "{}");

        assert_eq!(
            source.list().unwrap(),
            vec!["dallas-tx".to_owned(), "austin-tx".to_owned()]
        );
    }

    #[test]
    fn test_with_entry_replaces() {
        let source = MockSource::new()
            .with_entry("austin-tx", "old")
            .with_entry("austin-tx", "new");

        assert_eq!(source.list().unwrap().len(), 1);
        assert_eq!(source.read("austin-tx").unwrap(), "new");
    }

    #[test]
    fn test_read_missing() {
        let source = MockSource::new();

        let err = source.read("missing").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
        assert_eq!(err.path.as_deref(), Some(Path::new("missing")));
    }

    #[test]
    fn test_unavailable() {
        let source = MockSource::unavailable();

        assert!(!source.is_available());
        assert_eq!(source.list().unwrap_err().kind, StorageErrorKind::Unavailable);
    }
}
