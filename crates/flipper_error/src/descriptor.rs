//! Media descriptor error types.

/// Result type for descriptor construction and decoding.
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Kinds of descriptor errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DescriptorErrorKind {
    /// Construction input was empty or otherwise unusable
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),
    /// Serialized record was truncated or malformed
    #[display("Malformed descriptor record: {}", _0)]
    MalformedRecord(String),
}

/// Descriptor error with location tracking.
///
/// # Examples
///
/// ```
/// use flipper_error::{DescriptorError, DescriptorErrorKind};
///
/// let err = DescriptorError::new(DescriptorErrorKind::InvalidArgument("name is empty".into()));
/// assert!(format!("{}", err).contains("name is empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Descriptor Error: {} at line {} in {}", kind, line, file)]
pub struct DescriptorError {
    kind: DescriptorErrorKind,
    line: u32,
    file: &'static str,
}

impl DescriptorError {
    /// Create a new descriptor error with caller location tracking.
    #[track_caller]
    pub fn new(kind: DescriptorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`DescriptorErrorKind::InvalidArgument`] error.
    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(DescriptorErrorKind::InvalidArgument(message.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DescriptorErrorKind {
        &self.kind
    }
}
