//! Error types for the Flipper library.
//!
//! This crate provides the foundation error types used throughout the Flipper workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use flipper_error::{FlipperResult, PublishError, PublishErrorKind};
//!
//! fn publish() -> FlipperResult<String> {
//!     Err(PublishError::new(PublishErrorKind::CreateFailed(
//!         "store refused the entry".to_string(),
//!     )))?
//! }
//!
//! match publish() {
//!     Ok(locator) => println!("Published: {}", locator),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod descriptor;
mod error;
mod publish;
mod storage;

pub use config::{ConfigError, ConfigErrorKind};
pub use descriptor::{DescriptorError, DescriptorErrorKind, DescriptorResult};
pub use error::{FlipperError, FlipperErrorKind, FlipperResult};
pub use publish::{PublishError, PublishErrorKind};
pub use storage::{StorageError, StorageErrorKind, StorageResult};
