//! Media publishing for Flipper.
//!
//! [`MediaPublisher`] creates a new writable media entry and hands an open
//! stream plus a durable [`Locator`](flipper_core::Locator) to a write
//! callback. Depending on a capability flag resolved once per call, the entry
//! is created either through a [`ManagedStore`] (a catalog that mediates
//! creation) or directly on the filesystem through [`LegacyStorage`].
//!
//! # Example
//!
//! ```rust,no_run
//! use flipper_core::MediaCategory;
//! use flipper_error::FlipperError;
//! use flipper_storage::{MediaPublisher, PublisherConfig};
//! use std::io::Write;
//!
//! # fn main() -> Result<(), FlipperError> {
//! let config = PublisherConfig::load()?;
//! let mut publisher = MediaPublisher::from_config(&config, "Pictures", |mut stream, _locator| {
//!     stream.write_all(b"\x89PNG...").map_err(|e| {
//!         flipper_error::StorageError::new(flipper_error::StorageErrorKind::FileWrite(e.to_string()))
//!     })?;
//!     Ok::<(), FlipperError>(())
//! })?
//! .with_sub_folder("Screenshots");
//!
//! let locator = publisher.publish(MediaCategory::Image, "capture", "image/png")?;
//! println!("published {locator}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod filesystem;
mod host;
mod media_store;
mod paths;
mod publisher;
mod request;
mod strategy;

pub use config::PublisherConfig;
pub use filesystem::FileSystemStorage;
pub use host::{
    CapabilityProbe, LegacyStorage, ManagedStore, MediaRecord, MediaStream, MountState,
    StaticCapability, StorageHost,
};
pub use media_store::{FileSystemMediaStore, StoreEntry};
pub use publisher::MediaPublisher;
pub use request::PublishRequest;
pub use strategy::{
    DirectPathStrategy, ManagedStoreStrategy, PublishStrategy, PublishTarget, StrategyKind,
};
