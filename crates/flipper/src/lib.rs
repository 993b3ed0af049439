//! Flipper - media publishing
//!
//! Flipper creates new media files (images, video, audio) in a public
//! storage area. On hosts with a managed media store the entry is inserted
//! through the store and addressed by a `content://` locator; on legacy hosts
//! the file is written straight to a category directory and addressed by a
//! `file://` locator. Either way the caller's write callback receives an open
//! stream and the locator.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use flipper::{FlipperError, MediaPublisher, PublisherConfig, StorageError, StorageErrorKind};
//! use std::io::Write;
//!
//! fn main() -> Result<(), FlipperError> {
//!     flipper::init_logging().ok();
//!
//!     let config = PublisherConfig::load()?;
//!     let mut publisher = MediaPublisher::from_config(&config, "Pictures", |mut stream, locator| {
//!         stream
//!             .write_all(b"...")
//!             .map_err(|e| StorageError::new(StorageErrorKind::FileWrite(e.to_string())))?;
//!         tracing::info!(%locator, "wrote image");
//!         Ok::<(), FlipperError>(())
//!     })?;
//!
//!     publisher.publish_image("sunset", "image/jpeg")?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `flipper_error` - Error types
//! - `flipper_core` - Media descriptor, locator and MIME mapping
//! - `flipper_storage` - Publisher, strategies and storage backends
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use flipper_core::*;
pub use flipper_error::*;
pub use flipper_storage::*;

pub use observability::{LoggingConfig, init_logging, init_logging_with_config};
