//! Media descriptor: the name, type and optional locator of a media file.

use crate::{DocumentResolver, Locator, MIME_WILDCARD, extension_for_mime, mime_for_extension};
use flipper_error::{DescriptorError, DescriptorResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Describes a media file by base name and MIME type.
///
/// `name` never carries an extension; [`full_name`](Self::full_name) derives
/// one from the MIME type. The locator is only present once the underlying
/// resource exists, and is never derived implicitly.
///
/// # Examples
///
/// ```
/// use flipper_core::MediaDescriptor;
///
/// let descriptor = MediaDescriptor::from_raw_parts("sunset", "image/png")?;
/// assert_eq!(descriptor.full_name(), "sunset.png");
/// assert!(descriptor.locator().is_none());
/// # Ok::<(), flipper_error::DescriptorError>(())
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(try_from = "DescriptorFields")]
pub struct MediaDescriptor {
    /// Base name, without extension.
    name: String,
    /// Canonical MIME type; `*/*` when unknown.
    mime_type: String,
    /// Handle to the stored resource, once it exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locator: Option<Locator>,
}

/// Unvalidated serde shape of [`MediaDescriptor`].
#[derive(Deserialize)]
struct DescriptorFields {
    name: String,
    mime_type: String,
    #[serde(default)]
    locator: Option<Locator>,
}

impl TryFrom<DescriptorFields> for MediaDescriptor {
    type Error = DescriptorError;

    fn try_from(fields: DescriptorFields) -> Result<Self, Self::Error> {
        Ok(Self::from_raw_parts(fields.name, fields.mime_type)?.with_locator(fields.locator))
    }
}

impl MediaDescriptor {
    /// Alias for [`from_raw_parts`](Self::from_raw_parts).
    #[track_caller]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> DescriptorResult<Self> {
        Self::from_raw_parts(name, mime_type)
    }

    /// Build a descriptor for a file that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` or `mime_type` is empty.
    #[track_caller]
    pub fn from_raw_parts(
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> DescriptorResult<Self> {
        let name = name.into();
        let mime_type = mime_type.into();
        if name.is_empty() {
            return Err(DescriptorError::invalid_argument("name must not be empty"));
        }
        if mime_type.is_empty() {
            return Err(DescriptorError::invalid_argument(
                "mime type must not be empty",
            ));
        }
        Ok(Self {
            name,
            mime_type,
            locator: None,
        })
    }

    /// Build a descriptor from a file path by splitting its base name at the
    /// first `.`.
    ///
    /// `photo.png` becomes name `photo` with type `image/png`. A base name
    /// without a dot, or one starting with a dot, keeps the whole name and
    /// gets [`MIME_WILDCARD`]. An unknown extension also yields the wildcard.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the path has no final component.
    #[track_caller]
    pub fn from_file_like(path: impl AsRef<Path>) -> DescriptorResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                DescriptorError::invalid_argument(format!("{} has no file name", path.display()))
            })?;

        let (name, mime_type) = match file_name.find('.') {
            Some(dot) if dot > 0 => {
                let mime_type = mime_for_extension(&file_name[dot + 1..]).unwrap_or(MIME_WILDCARD);
                (file_name[..dot].to_string(), mime_type.to_string())
            }
            _ => (file_name, MIME_WILDCARD.to_string()),
        };

        Ok(Self {
            name,
            mime_type,
            locator: None,
        })
    }

    /// Build a descriptor for a resource that already exists, through a
    /// [`DocumentResolver`].
    ///
    /// The locator is taken from the resolved document. A document without a
    /// type gets [`MIME_WILDCARD`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the reference does not resolve, is not a
    /// regular file, or has no name.
    #[track_caller]
    pub fn from_existing_resource<R>(resolver: &R, reference: &str) -> DescriptorResult<Self>
    where
        R: DocumentResolver + ?Sized,
    {
        let document = resolver.resolve(reference).ok_or_else(|| {
            DescriptorError::invalid_argument(format!("{reference} could not be resolved"))
        })?;
        if !document.is_file {
            return Err(DescriptorError::invalid_argument(format!(
                "{reference} is not a file"
            )));
        }
        let name = document
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DescriptorError::invalid_argument(format!("{reference} has no name")))?;
        let mime_type = document
            .mime_type
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| MIME_WILDCARD.to_string());

        Ok(Self {
            name,
            mime_type,
            locator: Some(document.locator),
        })
    }

    /// Name with the extension implied by the MIME type, e.g. `myimage.png`.
    ///
    /// Without a known extension the bare name is returned, with no trailing dot.
    pub fn full_name(&self) -> String {
        match extension_for_mime(&self.mime_type) {
            Some(ext) => format!("{}.{}", self.name, ext),
            None => self.name.clone(),
        }
    }

    /// Replace the name. `None` and empty input are ignored on purpose so that
    /// optional-field updates can be applied without checking each field.
    pub fn set_name(&mut self, name: Option<&str>) {
        let Some(name) = name.filter(|name| !name.is_empty()) else {
            return;
        };
        self.name = name.to_string();
    }

    /// Replace the MIME type. `None` and empty input are ignored, like
    /// [`set_name`](Self::set_name).
    pub fn set_mime_type(&mut self, mime_type: Option<&str>) {
        let Some(mime_type) = mime_type.filter(|mime| !mime.is_empty()) else {
            return;
        };
        self.mime_type = mime_type.to_string();
    }

    /// Assign or clear the locator.
    pub fn set_locator(&mut self, locator: Option<Locator>) {
        self.locator = locator;
    }

    /// Builder-style [`set_locator`](Self::set_locator).
    pub fn with_locator(mut self, locator: Option<Locator>) -> Self {
        self.locator = locator;
        self
    }
}
