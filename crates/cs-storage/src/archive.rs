//! Zip archive content source and packing.
//!
//! The archive holds one `<key>.json` entry per document at its root. It is
//! opened lazily on first use and at most once per [`ArchiveSource`]; an
//! archive that fails to open stays unavailable for the life of the source.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::dir::DirSource;
use crate::storage::{
    ContentSource, DOCUMENT_SUFFIX, StorageError, StorageErrorKind, key_from_name, validate_key,
};

const BACKEND: &str = "Archive";

type Archive = ZipArchive<BufReader<File>>;

/// Content source backed by a single zip archive.
pub struct ArchiveSource {
    path: PathBuf,
    handle: OnceLock<Option<Mutex<Archive>>>,
}

impl ArchiveSource {
    /// Create a source for the archive at `path`. Nothing is opened yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: OnceLock::new(),
        }
    }

    /// Archive file this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open handle, or `None` if the archive is missing or unreadable.
    ///
    /// Concurrent first callers block until one of them finishes opening,
    /// then all observe the same outcome.
    fn archive(&self) -> Option<&Mutex<Archive>> {
        self.handle
            .get_or_init(|| match open_archive(&self.path) {
                Ok(archive) => {
                    tracing::info!(
                        path = %self.path.display(),
                        entries = archive.len(),
                        "Opened content archive"
                    );
                    Some(Mutex::new(archive))
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(path = %self.path.display(), "No content archive");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Content archive unavailable");
                    None
                }
            })
            .as_ref()
    }

    fn unavailable(&self) -> StorageError {
        StorageError::new(StorageErrorKind::Unavailable)
            .with_path(&self.path)
            .with_backend(BACKEND)
    }
}

impl std::fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("path", &self.path)
            .field("opened", &self.handle.get().map(Option::is_some))
            .finish()
    }
}

fn open_archive(path: &Path) -> Result<Archive, StorageError> {
    let file = File::open(path)
        .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| {
        StorageError::new(StorageErrorKind::Corrupt)
            .with_path(path)
            .with_backend(BACKEND)
            .with_source(e)
    })
}

impl ContentSource for ArchiveSource {
    fn list(&self) -> Result<Vec<String>, StorageError> {
        let archive = self.archive().ok_or_else(|| self.unavailable())?;
        let archive = archive.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(archive
            .file_names()
            .filter_map(key_from_name)
            .map(str::to_owned)
            .collect())
    }

    fn read(&self, key: &str) -> Result<String, StorageError> {
        validate_key(key, BACKEND)?;
        let archive = self.archive().ok_or_else(|| self.unavailable())?;
        let mut archive = archive.lock().unwrap_or_else(PoisonError::into_inner);

        let name = format!("{key}{DOCUMENT_SUFFIX}");
        let mut entry = match archive.by_name(&name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(StorageError::not_found(name).with_backend(BACKEND));
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::Corrupt)
                    .with_path(name)
                    .with_backend(BACKEND)
                    .with_source(e));
            }
        };

        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(&name))).with_backend(BACKEND))?;
        Ok(content)
    }

    fn is_available(&self) -> bool {
        self.archive().is_some()
    }
}

/// Outcome of [`pack_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Archive that was written.
    pub archive: PathBuf,
    /// Keys of the packed documents, in archive order.
    pub keys: Vec<String>,
    /// Size of the written archive in bytes.
    pub bytes: u64,
}

/// Pack every `<key>.json` file directly inside `dir` into a zip archive.
///
/// Entries are written in sorted key order as the files' raw bytes, so
/// repeated runs over the same directory produce the same entry set. The
/// archive is staged in a temporary file beside its destination and renamed
/// into place; on any error the staging file is removed.
///
/// # Errors
///
/// Returns [`StorageError`] if `dir` does not exist or any file cannot be read
/// or written.
pub fn pack_directory(dir: &Path, archive: &Path) -> Result<PackReport, StorageError> {
    const PACK_BACKEND: &str = "Pack";
    let io_err = |e: std::io::Error, path: &Path| {
        StorageError::io(e, Some(path.to_path_buf())).with_backend(PACK_BACKEND)
    };

    let source = DirSource::new(dir);
    if !source.is_available() {
        return Err(StorageError::not_found(dir).with_backend(PACK_BACKEND));
    }

    let mut keys = source.list()?;
    keys.sort();

    let parent = match archive.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| io_err(e, parent))?;

    let mut staging = NamedTempFile::new_in(parent).map_err(|e| io_err(e, parent))?;
    let zip_err = |e: ZipError| {
        StorageError::new(StorageErrorKind::Other)
            .with_path(archive)
            .with_backend(PACK_BACKEND)
            .with_source(e)
    };

    let mut writer = ZipWriter::new(staging.as_file_mut());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for key in &keys {
        let path = dir.join(format!("{key}{DOCUMENT_SUFFIX}"));
        let content = fs::read(&path).map_err(|e| io_err(e, &path))?;
        writer
            .start_file(format!("{key}{DOCUMENT_SUFFIX}"), options)
            .map_err(zip_err)?;
        writer
            .write_all(&content)
            .map_err(|e| io_err(e, archive))?;
    }
    writer.finish().map_err(zip_err)?;

    staging
        .persist(archive)
        .map_err(|e| io_err(e.error, archive))?;
    let bytes = fs::metadata(archive)
        .map_err(|e| io_err(e, archive))?
        .len();

    tracing::info!(
        archive = %archive.display(),
        documents = keys.len(),
        bytes,
        "Packed content archive"
    );

    Ok(PackReport {
        archive: archive.to_path_buf(),
        keys,
        bytes,
    })
}
