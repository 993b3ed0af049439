//! Top-level error wrapper types.

use crate::{ConfigError, DescriptorError, PublishError, StorageError};

/// Union of every error family in the workspace.
///
/// # Examples
///
/// ```
/// use flipper_error::{ConfigError, ConfigErrorKind, FlipperError};
///
/// let config_err = ConfigError::new(ConfigErrorKind::Read("flipper.toml not found".into()));
/// let err: FlipperError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FlipperErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Media descriptor error
    #[from(DescriptorError)]
    Descriptor(DescriptorError),
    /// Publishing error
    #[from(PublishError)]
    Publish(PublishError),
    /// Storage collaborator error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Flipper error with kind discrimination.
///
/// # Examples
///
/// ```
/// use flipper_error::{FlipperResult, PublishError, PublishErrorKind};
///
/// fn might_fail() -> FlipperResult<()> {
///     Err(PublishError::new(PublishErrorKind::OpenFailed("disk full".into())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Flipper Error: {}", _0)]
pub struct FlipperError(Box<FlipperErrorKind>);

impl FlipperError {
    /// Create a new error from a kind.
    pub fn new(kind: FlipperErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FlipperErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FlipperErrorKind
impl<T> From<T> for FlipperError
where
    T: Into<FlipperErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Flipper operations.
pub type FlipperResult<T> = std::result::Result<T, FlipperError>;
