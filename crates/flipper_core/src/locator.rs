//! Durable handles to stored media.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONTENT_SCHEME: &str = "content";
const FILE_PREFIX: &str = "file://";

/// Opaque, durable reference to a stored media entry.
///
/// A locator is a URI. Entries created through a managed store look like
/// `content://media/<volume>/<collection>/media/<id>`; files written directly
/// look like `file:///absolute/path.png`.
///
/// # Examples
///
/// ```
/// use flipper_core::Locator;
/// use std::path::Path;
///
/// let content = Locator::content("external_primary", "images", 42);
/// assert_eq!(content.as_str(), "content://media/external_primary/images/media/42");
/// assert_eq!(content.content_id(), Some(42));
///
/// let file = Locator::from_file_path(Path::new("/sdcard/Pictures/cat.png"));
/// assert_eq!(file.scheme(), Some("file"));
/// assert_eq!(file.to_file_path().unwrap(), Path::new("/sdcard/Pictures/cat.png"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Locator(String);

impl Locator {
    /// Wrap an existing URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Locator for a managed-store entry.
    pub fn content(volume: &str, collection: &str, id: u64) -> Self {
        Self(format!(
            "{CONTENT_SCHEME}://media/{volume}/{collection}/media/{id}"
        ))
    }

    /// Locator for a file addressed by path.
    pub fn from_file_path(path: &Path) -> Self {
        Self(format!("{FILE_PREFIX}{}", path.display()))
    }

    /// The URI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme, if the locator has one.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Filesystem path of a `file://` locator.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.0.strip_prefix(FILE_PREFIX).map(PathBuf::from)
    }

    /// Numeric entry id of a `content://` locator.
    pub fn content_id(&self) -> Option<u64> {
        if self.scheme() != Some(CONTENT_SCHEME) {
            return None;
        }
        self.0.rsplit('/').next()?.parse().ok()
    }
}

impl From<String> for Locator {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
