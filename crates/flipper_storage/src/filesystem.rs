//! Filesystem-backed legacy storage.
//!
//! Used when no managed store is available: category roots are plain
//! directories below a base path and files are opened directly.

use crate::paths::is_contained;
use crate::{LegacyStorage, MountState};
use flipper_error::{StorageError, StorageErrorKind, StorageResult};
use std::path::{Path, PathBuf};

/// Legacy storage rooted at a base directory.
///
/// # Example Structure
///
/// ```text
/// /storage/emulated/0/
/// ├── Pictures/
/// │   └── Screenshots/
/// │       └── capture.png
/// ├── Movies/
/// │   └── clip.mp4
/// └── Music/
///     └── theme.mp3
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
    read_only: bool,
}

impl FileSystemStorage {
    /// Create a legacy storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created legacy filesystem storage");
        Ok(Self {
            base_path,
            read_only: false,
        })
    }

    /// Report the storage area as mounted read-only regardless of permissions.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl LegacyStorage for FileSystemStorage {
    fn category_root(&self, root: &str) -> PathBuf {
        self.base_path.join(root)
    }

    #[tracing::instrument(skip(self, directory), fields(directory = %directory.display()))]
    fn mount_state(&self, directory: &Path) -> MountState {
        let inside = directory
            .strip_prefix(&self.base_path)
            .is_ok_and(is_contained);
        if !inside {
            tracing::debug!("Directory is outside the storage area");
            return MountState::Unavailable;
        }

        let state = match std::fs::metadata(&self.base_path) {
            Ok(metadata) if !metadata.is_dir() => MountState::Unavailable,
            Ok(_) if self.read_only => MountState::MountedReadOnly,
            Ok(metadata) if metadata.permissions().readonly() => MountState::MountedReadOnly,
            Ok(_) => MountState::Mounted,
            Err(e) => {
                tracing::debug!(error = %e, "Storage area is not accessible");
                MountState::Unavailable
            }
        };

        tracing::debug!(%state, "Resolved mount state");
        state
    }
}
