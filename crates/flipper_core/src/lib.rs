//! Core data types for the Flipper media publishing library.
//!
//! This crate provides the value types shared by every publishing strategy:
//! the [`MediaDescriptor`] naming a media file, the opaque [`Locator`] that
//! addresses a stored entry, the [`MediaCategory`] selecting a collection and
//! the advisory MIME/extension mapping.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod descriptor;
mod document;
mod locator;
mod mime;
mod record;

pub use category::MediaCategory;
pub use descriptor::MediaDescriptor;
pub use document::{DocumentResolver, ResolvedDocument};
pub use locator::Locator;
pub use mime::{MIME_WILDCARD, extension_for_mime, mime_for_extension, split_extension};
