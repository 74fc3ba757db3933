//! Content sources for the citysite engine.
//!
//! This crate provides a [`ContentSource`] trait for abstracting how city
//! documents are listed and read. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Deployment flexibility** (loose JSON files in development, one packed archive in production)
//! - **Clean separation** between record parsing and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentSource`] trait with `list()`, `read()`, and `is_available()` methods
//! - [`DirSource`] for a directory of `<key>.json` files
//! - [`ArchiveSource`] for a zip archive opened lazily, at most once
//! - [`LayeredSource`] that prefers the archive and falls back to the directory
//! - [`pack_directory`] to build the archive from a directory
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use cs_storage::{ArchiveSource, ContentSource, DirSource, LayeredSource};
//!
//! let source = LayeredSource::new(
//!     ArchiveSource::new("data/cities.zip"),
//!     DirSource::new("data/cities"),
//! );
//! for key in source.list()? {
//!     let json = source.read(&key)?;
//! }
//! ```

mod archive;
mod dir;
mod layered;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod storage;

pub use archive::{ArchiveSource, PackReport, pack_directory};
pub use dir::DirSource;
pub use layered::LayeredSource;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use storage::{ContentSource, DOCUMENT_SUFFIX, StorageError, StorageErrorKind};
