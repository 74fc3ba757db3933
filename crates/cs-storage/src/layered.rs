//! Archive-first content source with a loose-file fallback.

use crate::storage::{ContentSource, StorageError, StorageErrorKind};

/// Two content sources consulted in order.
///
/// Reads try the primary source first and fall back to the secondary one
/// for anything other than an invalid key. Listing uses the primary source
/// whenever it is available, otherwise the secondary one.
pub struct LayeredSource {
    primary: Box<dyn ContentSource>,
    fallback: Box<dyn ContentSource>,
}

impl LayeredSource {
    /// Layer `primary` over `fallback`.
    #[must_use]
    pub fn new(primary: impl ContentSource + 'static, fallback: impl ContentSource + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }

    /// Warn when neither source can serve anything.
    fn warn_if_empty(&self) -> bool {
        let empty = !self.is_available();
        if empty {
            tracing::warn!("No content archive or data directory; serving no cities");
        }
        empty
    }
}

impl ContentSource for LayeredSource {
    fn list(&self) -> Result<Vec<String>, StorageError> {
        if self.primary.is_available() {
            self.primary.list()
        } else {
            self.warn_if_empty();
            self.fallback.list()
        }
    }

    fn read(&self, key: &str) -> Result<String, StorageError> {
        match self.primary.read(key) {
            Ok(content) => Ok(content),
            Err(e) if e.kind == StorageErrorKind::InvalidPath => Err(e),
            Err(e) if self.warn_if_empty() => Err(e),
            Err(e) => {
                tracing::debug!(key, error = %e, "Primary source miss, trying fallback");
                self.fallback.read(key)
            }
        }
    }

    fn is_available(&self) -> bool {
        self.primary.is_available() || self.fallback.is_available()
    }
}
