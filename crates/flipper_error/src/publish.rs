//! Publishing error types.

/// Kinds of publishing errors.
///
/// Every kind is terminal for the `publish` call that produced it. Nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishErrorKind {
    /// Display name or MIME type was empty
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),
    /// Legacy storage area is read-only or not mounted
    #[display("Storage unavailable: {}", _0)]
    StorageUnavailable(String),
    /// Managed store refused to create the entry
    #[display("Failed to create media entry: {}", _0)]
    CreateFailed(String),
    /// Entry exists but no writable stream could be obtained
    #[display("Failed to open media entry for writing: {}", _0)]
    OpenFailed(String),
}

/// Publishing error with location tracking.
///
/// # Examples
///
/// ```
/// use flipper_error::{PublishError, PublishErrorKind};
///
/// let err = PublishError::new(PublishErrorKind::StorageUnavailable("/sdcard is read-only".into()));
/// assert!(matches!(err.kind(), PublishErrorKind::StorageUnavailable(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    kind: PublishErrorKind,
    line: u32,
    file: &'static str,
}

impl PublishError {
    /// Create a new publish error with caller location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PublishErrorKind {
        &self.kind
    }
}
