//! Filesystem-backed managed store.
//!
//! An in-process catalog that mediates creation of media entries the way a
//! platform media store does: callers submit a [`MediaRecord`], receive a
//! `content://` locator, and only then open the entry for writing.

use crate::paths::{is_contained, is_plain_name};
use crate::{ManagedStore, MediaRecord, MediaStream};
use flipper_core::{Locator, MediaCategory, split_extension};
use flipper_error::{StorageError, StorageErrorKind, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StoreEntry {
    /// Locator handed out on insert.
    locator: Locator,
    /// Collection the entry belongs to.
    category: MediaCategory,
    /// Record submitted on insert.
    record: MediaRecord,
    /// File backing the entry.
    path: PathBuf,
}

#[derive(Debug, Default)]
struct Catalog {
    next_id: u64,
    entries: BTreeMap<u64, StoreEntry>,
}

impl Catalog {
    fn is_taken(&self, path: &Path) -> bool {
        path.exists() || self.entries.values().any(|entry| entry.path == path)
    }
}

/// Managed store keeping its files below a base directory.
///
/// Files land in `{base_path}/{relative_path}/{display_name}.{ext}`. When
/// that name is taken, ` (1)`, ` (2)`, ... is appended to the display name.
#[derive(Debug)]
pub struct FileSystemMediaStore {
    base_path: PathBuf,
    volume: String,
    catalog: Mutex<Catalog>,
}

impl FileSystemMediaStore {
    /// Create a managed store on `volume`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path, volume))]
    pub fn new(base_path: impl Into<PathBuf>, volume: impl Into<String>) -> StorageResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        let volume = volume.into();
        tracing::info!(path = %base_path.display(), %volume, "Created managed media store");
        Ok(Self {
            base_path,
            volume,
            catalog: Mutex::new(Catalog::default()),
        })
    }

    /// Volume name used in locators.
    pub fn volume(&self) -> &str {
        &self.volume
    }

    /// Entry for a locator, if the catalog has one.
    pub fn entry(&self, locator: &Locator) -> Option<StoreEntry> {
        let id = locator.content_id()?;
        self.catalog
            .lock()
            .entries
            .get(&id)
            .filter(|entry| &entry.locator == locator)
            .cloned()
    }

    /// All catalog entries, in insertion order.
    pub fn entries(&self) -> Vec<StoreEntry> {
        self.catalog.lock().entries.values().cloned().collect()
    }

    /// Directory for a record's relative path, or `None` if it escapes the base.
    fn directory_for(&self, relative_path: &str) -> Option<PathBuf> {
        let relative = Path::new(relative_path);
        is_contained(relative).then(|| self.base_path.join(relative))
    }
}

/// First free `name[ (n)].ext` in `directory`.
fn unique_path(catalog: &Catalog, directory: &Path, record: &MediaRecord) -> PathBuf {
    let (stem, ext) = split_extension(&record.display_name, &record.mime_type);
    let ext = ext.map(|ext| format!(".{ext}")).unwrap_or_default();

    let mut candidate = directory.join(format!("{stem}{ext}"));
    let mut n = 1;
    while catalog.is_taken(&candidate) {
        candidate = directory.join(format!("{stem} ({n}){ext}"));
        n += 1;
    }
    candidate
}

impl ManagedStore for FileSystemMediaStore {
    #[tracing::instrument(skip(self, record), fields(name = %record.display_name, relative_path = %record.relative_path))]
    fn insert(
        &self,
        category: MediaCategory,
        record: &MediaRecord,
    ) -> StorageResult<Option<Locator>> {
        if record.display_name.trim().is_empty() {
            tracing::warn!("Refusing entry without display name");
            return Ok(None);
        }
        if !is_plain_name(&record.display_name) {
            tracing::warn!("Refusing display name that is not a plain file name");
            return Ok(None);
        }
        let Some(directory) = self.directory_for(&record.relative_path) else {
            tracing::warn!("Refusing entry outside the store");
            return Ok(None);
        };

        let mut catalog = self.catalog.lock();
        let path = unique_path(&catalog, &directory, record);
        catalog.next_id += 1;
        let id = catalog.next_id;
        let locator = Locator::content(&self.volume, category.collection(), id);

        tracing::info!(%locator, path = %path.display(), owner = %record.owner, "Inserted media entry");
        catalog.entries.insert(
            id,
            StoreEntry {
                locator: locator.clone(),
                category,
                record: record.clone(),
                path,
            },
        );
        Ok(Some(locator))
    }

    #[tracing::instrument(skip(self, locator), fields(%locator))]
    fn open_for_write(&self, locator: &Locator) -> StorageResult<Option<MediaStream>> {
        let Some(entry) = self.entry(locator) else {
            tracing::debug!("No catalog entry for locator");
            return Ok(None);
        };

        if let Some(parent) = entry.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let file = std::fs::File::create(&entry.path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                entry.path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %entry.path.display(), "Opened media entry");
        Ok(Some(Box::new(file)))
    }

    #[tracing::instrument(skip(self, locator), fields(%locator))]
    fn remove(&self, locator: &Locator) -> StorageResult<()> {
        let entry = {
            let mut catalog = self.catalog.lock();
            locator
                .content_id()
                .filter(|id| {
                    catalog
                        .entries
                        .get(id)
                        .is_some_and(|entry| &entry.locator == locator)
                })
                .and_then(|id| catalog.entries.remove(&id))
        }
        .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(locator.to_string())))?;

        match std::fs::remove_file(&entry.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    entry.path.display(),
                    e
                ))));
            }
        }

        tracing::info!(path = %entry.path.display(), "Removed media entry");
        Ok(())
    }
}
