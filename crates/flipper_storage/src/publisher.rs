//! The media publisher.

use crate::paths::{is_contained, is_plain_name};
use crate::{
    DirectPathStrategy, ManagedStoreStrategy, MediaStream, PublishRequest, PublishStrategy,
    PublishTarget, PublisherConfig, StorageHost, StrategyKind,
};
use flipper_core::{Locator, MediaCategory, MediaDescriptor};
use flipper_error::{PublishError, PublishErrorKind, StorageResult};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_OWNER: &str = "flipper";

/// Publishes new media entries and hands them to a write callback.
///
/// The callback receives the open stream and the entry's locator. It is
/// responsible for writing the content and for closing the stream, which
/// happens when the stream is dropped. The publisher keeps no reference to
/// the stream after hand-off.
///
/// # Examples
///
/// ```
/// use flipper_error::FlipperError;
/// use flipper_storage::{
///     FileSystemMediaStore, FileSystemStorage, MediaPublisher, StaticCapability, StorageHost,
/// };
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = tempfile::TempDir::new()?;
/// let host = StorageHost::new(
///     Arc::new(StaticCapability::new(false)),
///     Arc::new(FileSystemMediaStore::new(root.path(), "external_primary")?),
///     Arc::new(FileSystemStorage::new(root.path())?),
/// );
///
/// let mut publisher = MediaPublisher::new(host, "Music", |stream, locator| {
///     drop(stream);
///     println!("saved to {locator}");
///     Ok::<(), FlipperError>(())
/// });
///
/// let locator = publisher.publish_audio("theme", "audio/mpeg")?;
/// assert_eq!(locator.to_file_path(), Some(root.path().join("Music/theme.mp3")));
/// # Ok(())
/// # }
/// ```
pub struct MediaPublisher<F> {
    host: StorageHost,
    root: String,
    sub_folder: Option<String>,
    owner: String,
    remove_orphaned_entries: bool,
    listener: F,
}

impl<F> MediaPublisher<F> {
    /// Create a publisher writing below the category root `root` (e.g. `Pictures`).
    pub fn new<E>(host: StorageHost, root: impl Into<String>, listener: F) -> Self
    where
        F: FnMut(MediaStream, Locator) -> Result<(), E>,
    {
        Self {
            host,
            root: root.into(),
            sub_folder: None,
            owner: DEFAULT_OWNER.to_string(),
            remove_orphaned_entries: false,
            listener,
        }
    }

    /// Create a publisher on the filesystem host described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the storage root cannot be created.
    pub fn from_config<E>(
        config: &PublisherConfig,
        root: impl Into<String>,
        listener: F,
    ) -> StorageResult<Self>
    where
        F: FnMut(MediaStream, Locator) -> Result<(), E>,
    {
        let host = StorageHost::filesystem(config)?;
        Ok(Self::new(host, root, listener)
            .with_owner(config.owner().clone())
            .with_orphan_removal(*config.remove_orphaned_entries()))
    }

    /// Publish below `root/sub_folder`.
    pub fn with_sub_folder(mut self, sub_folder: impl Into<String>) -> Self {
        self.set_sub_folder(Some(sub_folder.into()));
        self
    }

    /// Change or clear the sub-folder. An empty name clears it.
    pub fn set_sub_folder(&mut self, sub_folder: Option<String>) {
        self.sub_folder = sub_folder.filter(|sub| !sub.is_empty());
    }

    /// Owner recorded on managed-store entries.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Remove a managed-store entry again when it was inserted but could not
    /// be opened. Off by default, which leaves the entry in the store.
    pub fn with_orphan_removal(mut self, enabled: bool) -> Self {
        self.remove_orphaned_entries = enabled;
        self
    }

    /// Category root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Current sub-folder, if any.
    pub fn sub_folder(&self) -> Option<&str> {
        self.sub_folder.as_deref()
    }

    /// Strategy a publish call made now would use.
    pub fn strategy(&self) -> StrategyKind {
        StrategyKind::resolve(self.host.capability().has_managed_store())
    }

    /// Create a new entry in `category` and hand it to the write callback.
    ///
    /// Returns the locator that was passed to the callback.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `display_name` or `mime_type` is empty, if
    ///   `display_name` is not a plain file name, or if the root or
    ///   sub-folder would lead out of the storage area
    /// - `StorageUnavailable` if the legacy storage area is not writable
    /// - `CreateFailed` if the managed store refuses the entry
    /// - `OpenFailed` if no writable stream can be obtained
    ///
    /// On any of these the callback is not invoked. An error returned by the
    /// callback itself is propagated unchanged.
    #[tracing::instrument(skip(self), fields(root = %self.root, sub_folder = ?self.sub_folder))]
    pub fn publish<E>(
        &mut self,
        category: MediaCategory,
        display_name: &str,
        mime_type: &str,
    ) -> Result<Locator, E>
    where
        F: FnMut(MediaStream, Locator) -> Result<(), E>,
        E: From<PublishError>,
    {
        let descriptor = MediaDescriptor::from_raw_parts(display_name, mime_type)
            .map_err(|e| PublishError::new(PublishErrorKind::InvalidArgument(e.kind().to_string())))?;
        if !is_plain_name(display_name) {
            return Err(PublishError::new(PublishErrorKind::InvalidArgument(format!(
                "display name {display_name:?} is not a plain file name"
            )))
            .into());
        }
        let request = PublishRequest::new(
            category,
            self.root.as_str(),
            self.sub_folder.as_deref(),
            descriptor,
        );
        let relative_path = request.relative_path();
        if !is_contained(Path::new(&relative_path)) {
            return Err(PublishError::new(PublishErrorKind::InvalidArgument(format!(
                "{relative_path:?} leads out of the storage area"
            )))
            .into());
        }

        let kind = self.strategy();
        debug!(strategy = %kind, "Selected publish strategy");

        let PublishTarget { stream, locator } = {
            let strategy: Box<dyn PublishStrategy + '_> = match kind {
                StrategyKind::ManagedStore => Box::new(
                    ManagedStoreStrategy::new(self.host.managed_store(), &self.owner)
                        .remove_orphaned_entries(self.remove_orphaned_entries),
                ),
                StrategyKind::DirectPath => {
                    Box::new(DirectPathStrategy::new(self.host.legacy_storage()))
                }
            };
            strategy.create(&request)?
        };

        (self.listener)(stream, locator.clone())?;

        info!(%locator, strategy = %kind, "Published media entry");
        Ok(locator)
    }

    /// [`publish`](Self::publish) into the image collection.
    pub fn publish_image<E>(&mut self, display_name: &str, mime_type: &str) -> Result<Locator, E>
    where
        F: FnMut(MediaStream, Locator) -> Result<(), E>,
        E: From<PublishError>,
    {
        self.publish(MediaCategory::Image, display_name, mime_type)
    }

    /// [`publish`](Self::publish) into the video collection.
    pub fn publish_video<E>(&mut self, display_name: &str, mime_type: &str) -> Result<Locator, E>
    where
        F: FnMut(MediaStream, Locator) -> Result<(), E>,
        E: From<PublishError>,
    {
        self.publish(MediaCategory::Video, display_name, mime_type)
    }

    /// [`publish`](Self::publish) into the audio collection.
    pub fn publish_audio<E>(&mut self, display_name: &str, mime_type: &str) -> Result<Locator, E>
    where
        F: FnMut(MediaStream, Locator) -> Result<(), E>,
        E: From<PublishError>,
    {
        self.publish(MediaCategory::Audio, display_name, mime_type)
    }
}

impl<F> fmt::Debug for MediaPublisher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPublisher")
            .field("root", &self.root)
            .field("sub_folder", &self.sub_folder)
            .field("owner", &self.owner)
            .field("remove_orphaned_entries", &self.remove_orphaned_entries)
            .finish_non_exhaustive()
    }
}
