//! The two ways of creating a writable media entry.
//!
//! A publisher resolves a [`StrategyKind`] once per call and runs exactly one
//! [`PublishStrategy`] end to end.

use crate::{LegacyStorage, ManagedStore, MediaRecord, MediaStream, MountState, PublishRequest};
use flipper_core::Locator;
use flipper_error::{PublishError, PublishErrorKind};
use std::fmt;
use tracing::{debug, warn};

/// Which strategy a publish call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StrategyKind {
    /// Insert through a managed store
    #[display("managed-store")]
    ManagedStore,
    /// Write straight to a filesystem path
    #[display("direct-path")]
    DirectPath,
}

impl StrategyKind {
    /// Map the capability flag to a strategy.
    pub fn resolve(has_managed_store: bool) -> Self {
        if has_managed_store {
            StrategyKind::ManagedStore
        } else {
            StrategyKind::DirectPath
        }
    }
}

/// An open stream on a freshly created entry, plus its locator.
pub struct PublishTarget {
    /// Open stream, ready for writing
    pub stream: MediaStream,
    /// Durable reference to the created entry
    pub locator: Locator,
}

impl fmt::Debug for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishTarget")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

/// Creates the backing entry for a request and opens it for writing.
pub trait PublishStrategy {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Create the entry and open a stream on it.
    ///
    /// No stream is returned unless both steps succeed.
    fn create(&self, request: &PublishRequest) -> Result<PublishTarget, PublishError>;
}

/// Creates entries through a [`ManagedStore`].
pub struct ManagedStoreStrategy<'a> {
    store: &'a dyn ManagedStore,
    owner: &'a str,
    remove_orphaned_entries: bool,
}

impl<'a> ManagedStoreStrategy<'a> {
    /// Strategy inserting records owned by `owner`.
    pub fn new(store: &'a dyn ManagedStore, owner: &'a str) -> Self {
        Self {
            store,
            owner,
            remove_orphaned_entries: false,
        }
    }

    /// Remove the inserted entry again when it cannot be opened.
    pub fn remove_orphaned_entries(mut self, enabled: bool) -> Self {
        self.remove_orphaned_entries = enabled;
        self
    }

    fn discard(&self, locator: &Locator) {
        if !self.remove_orphaned_entries {
            warn!(%locator, "Leaving orphaned media entry in store");
            return;
        }
        match self.store.remove(locator) {
            Ok(()) => debug!(%locator, "Removed orphaned media entry"),
            Err(e) => warn!(%locator, error = %e, "Failed to remove orphaned media entry"),
        }
    }
}

impl PublishStrategy for ManagedStoreStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ManagedStore
    }

    #[tracing::instrument(skip(self, request), fields(category = %request.category(), name = %request.display_name()))]
    fn create(&self, request: &PublishRequest) -> Result<PublishTarget, PublishError> {
        let record = MediaRecord {
            display_name: request.display_name().to_string(),
            mime_type: request.mime_type().to_string(),
            relative_path: request.relative_path(),
            owner: self.owner.to_string(),
        };

        let locator = match self.store.insert(*request.category(), &record) {
            Ok(Some(locator)) => locator,
            Ok(None) => {
                return Err(PublishError::new(PublishErrorKind::CreateFailed(format!(
                    "store returned no locator for {} in {}",
                    record.display_name, record.relative_path
                ))));
            }
            Err(e) => {
                return Err(PublishError::new(PublishErrorKind::CreateFailed(
                    e.to_string(),
                )));
            }
        };
        debug!(%locator, relative_path = %record.relative_path, "Inserted media entry");

        match self.store.open_for_write(&locator) {
            Ok(Some(stream)) => Ok(PublishTarget { stream, locator }),
            Ok(None) => {
                self.discard(&locator);
                Err(PublishError::new(PublishErrorKind::OpenFailed(format!(
                    "store has no stream for {locator}"
                ))))
            }
            Err(e) => {
                self.discard(&locator);
                Err(PublishError::new(PublishErrorKind::OpenFailed(format!(
                    "{locator}: {e}"
                ))))
            }
        }
    }
}

/// Writes entries straight to a path on [`LegacyStorage`].
pub struct DirectPathStrategy<'a> {
    storage: &'a dyn LegacyStorage,
}

impl<'a> DirectPathStrategy<'a> {
    /// Strategy writing through `storage`.
    pub fn new(storage: &'a dyn LegacyStorage) -> Self {
        Self { storage }
    }
}

impl PublishStrategy for DirectPathStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DirectPath
    }

    #[tracing::instrument(skip(self, request), fields(category = %request.category(), name = %request.display_name()))]
    fn create(&self, request: &PublishRequest) -> Result<PublishTarget, PublishError> {
        let mut directory = self.storage.category_root(request.base_folder());
        if let Some(sub) = request.sub_folder() {
            directory.push(sub);
        }

        let state = self.storage.mount_state(&directory);
        if state != MountState::Mounted {
            return Err(PublishError::new(PublishErrorKind::StorageUnavailable(
                format!("{} is {}", directory.display(), state),
            )));
        }

        if let Err(e) = self.storage.create_dir(&directory) {
            warn!(directory = %directory.display(), error = %e, "Could not create media directory");
        }

        let path = directory.join(request.file_name());
        let stream = self.storage.open_for_write(&path).map_err(|e| {
            PublishError::new(PublishErrorKind::OpenFailed(e.to_string()))
        })?;
        debug!(path = %path.display(), "Opened media file");

        Ok(PublishTarget {
            stream,
            locator: Locator::from_file_path(&path),
        })
    }
}
