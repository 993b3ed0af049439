//! Storage collaborators the publisher talks to.

use crate::{FileSystemMediaStore, FileSystemStorage, PublisherConfig};
use flipper_core::{Locator, MediaCategory};
use flipper_error::{StorageError, StorageErrorKind, StorageResult};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Writable byte sink handed to the write callback.
///
/// The callback owns it; dropping the stream closes it.
pub type MediaStream = Box<dyn Write + Send>;

/// Attribute record submitted to a [`ManagedStore`] on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MediaRecord {
    /// Display name, without extension
    pub display_name: String,
    /// MIME type of the content
    pub mime_type: String,
    /// `root[/sub_folder]` relative to the store's volume
    pub relative_path: String,
    /// Name of the application that owns the entry
    pub owner: String,
}

/// Mount state of a legacy storage area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MountState {
    /// Mounted and writable
    #[display("mounted")]
    Mounted,
    /// Mounted, but read-only
    #[display("mounted read-only")]
    MountedReadOnly,
    /// Missing or otherwise inaccessible
    #[display("unavailable")]
    Unavailable,
}

/// Reports whether a managed store is available.
pub trait CapabilityProbe: Send + Sync {
    /// `true` selects the managed-store strategy.
    fn has_managed_store(&self) -> bool;
}

/// Capability fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCapability(bool);

impl StaticCapability {
    /// Create a probe that always answers `has_managed_store`.
    pub fn new(has_managed_store: bool) -> Self {
        Self(has_managed_store)
    }
}

impl CapabilityProbe for StaticCapability {
    fn has_managed_store(&self) -> bool {
        self.0
    }
}

/// A catalog that mediates creation of media entries.
pub trait ManagedStore: Send + Sync {
    /// Insert a new entry into the collection for `category`.
    ///
    /// `Ok(None)` means the store refused to create the entry.
    fn insert(&self, category: MediaCategory, record: &MediaRecord)
    -> StorageResult<Option<Locator>>;

    /// Open a writable stream on an inserted entry.
    ///
    /// `Ok(None)` means the store has no stream to hand back, e.g. because
    /// the entry vanished after insert.
    fn open_for_write(&self, locator: &Locator) -> StorageResult<Option<MediaStream>>;

    /// Delete an entry.
    fn remove(&self, locator: &Locator) -> StorageResult<()>;
}

/// Direct filesystem access for hosts without a managed store.
pub trait LegacyStorage: Send + Sync {
    /// Resolve a category root such as `Pictures` to a directory.
    fn category_root(&self, root: &str) -> PathBuf;

    /// Mount state of the storage area holding `directory`.
    fn mount_state(&self, directory: &Path) -> MountState;

    /// Create `directory` and any missing parents.
    fn create_dir(&self, directory: &Path) -> StorageResult<()> {
        std::fs::create_dir_all(directory).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                directory.display(),
                e
            )))
        })
    }

    /// Create or truncate `path` and open it for writing.
    fn open_for_write(&self, path: &Path) -> StorageResult<MediaStream> {
        let file = std::fs::File::create(path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Box::new(file))
    }
}

/// The storage subsystem as seen by a publisher.
#[derive(Clone)]
pub struct StorageHost {
    capability: Arc<dyn CapabilityProbe>,
    managed_store: Arc<dyn ManagedStore>,
    legacy_storage: Arc<dyn LegacyStorage>,
}

impl StorageHost {
    /// Bundle a capability probe with both storage backends.
    pub fn new(
        capability: Arc<dyn CapabilityProbe>,
        managed_store: Arc<dyn ManagedStore>,
        legacy_storage: Arc<dyn LegacyStorage>,
    ) -> Self {
        Self {
            capability,
            managed_store,
            legacy_storage,
        }
    }

    /// Filesystem-backed host described by `config`.
    ///
    /// Both backends share `storage_root`. Without an explicit `managed_store`
    /// setting the managed store is assumed to be available.
    ///
    /// # Errors
    ///
    /// Returns error if the storage root cannot be created.
    pub fn filesystem(config: &PublisherConfig) -> StorageResult<Self> {
        let legacy = FileSystemStorage::new(config.storage_root())?.read_only(*config.read_only());
        let managed = FileSystemMediaStore::new(config.storage_root(), config.volume().clone())?;
        let capability = StaticCapability::new(config.managed_store().unwrap_or(true));

        Ok(Self::new(
            Arc::new(capability),
            Arc::new(managed),
            Arc::new(legacy),
        ))
    }

    /// Capability probe.
    pub fn capability(&self) -> &dyn CapabilityProbe {
        self.capability.as_ref()
    }

    /// Managed store backend.
    pub fn managed_store(&self) -> &dyn ManagedStore {
        self.managed_store.as_ref()
    }

    /// Legacy filesystem backend.
    pub fn legacy_storage(&self) -> &dyn LegacyStorage {
        self.legacy_storage.as_ref()
    }
}

impl fmt::Debug for StorageHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageHost").finish_non_exhaustive()
    }
}
