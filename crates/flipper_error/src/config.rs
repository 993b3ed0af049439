//! Configuration error types.

/// Kinds of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read
    #[display("Failed to read configuration: {}", _0)]
    Read(String),
    /// A value could not be deserialized
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// Values parsed but are unusable
    #[display("Invalid configuration: {}", _0)]
    Invalid(String),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use flipper_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Invalid("volume must not be empty".into()));
/// assert!(matches!(err.kind(), ConfigErrorKind::Invalid(_)));
/// assert!(format!("{}", err).contains("volume"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
