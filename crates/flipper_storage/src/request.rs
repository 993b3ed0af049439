//! Per-call publish request.

use flipper_core::{MediaCategory, MediaDescriptor, split_extension};

/// Where and under which name a single `publish` call creates its entry.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PublishRequest {
    /// Target collection.
    category: MediaCategory,
    /// Category root, e.g. `Pictures`.
    base_folder: String,
    /// Optional folder below the root.
    sub_folder: Option<String>,
    /// Display name and MIME type of the new entry.
    descriptor: MediaDescriptor,
}

impl PublishRequest {
    /// Build a request. An empty sub-folder counts as absent.
    pub fn new(
        category: MediaCategory,
        base_folder: impl Into<String>,
        sub_folder: Option<&str>,
        descriptor: MediaDescriptor,
    ) -> Self {
        Self {
            category,
            base_folder: base_folder.into(),
            sub_folder: sub_folder
                .filter(|sub| !sub.is_empty())
                .map(str::to_string),
            descriptor,
        }
    }

    /// Display name, without extension.
    pub fn display_name(&self) -> &str {
        self.descriptor.name()
    }

    /// MIME type of the content.
    pub fn mime_type(&self) -> &str {
        self.descriptor.mime_type()
    }

    /// `base_folder[/sub_folder]`.
    pub fn relative_path(&self) -> String {
        match &self.sub_folder {
            Some(sub) => format!("{}/{}", self.base_folder, sub),
            None => self.base_folder.clone(),
        }
    }

    /// Display name plus the extension implied by the MIME type.
    ///
    /// A display name that already ends in that extension keeps a single copy.
    pub fn file_name(&self) -> String {
        match split_extension(self.display_name(), self.mime_type()) {
            (stem, Some(ext)) => format!("{stem}.{ext}"),
            (stem, None) => stem.to_string(),
        }
    }
}
