//! Media category enumeration.

use serde::{Deserialize, Serialize};

/// Collection a new media entry is published into.
///
/// # Examples
///
/// ```
/// use flipper_core::MediaCategory;
///
/// let category: MediaCategory = "video".parse().unwrap();
/// assert_eq!(category, MediaCategory::Video);
/// assert_eq!(category.collection(), "video");
/// assert_eq!(MediaCategory::Image.default_root(), "Pictures");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MediaCategory {
    /// Still images (PNG, JPEG, WebP, etc.)
    #[display("image")]
    Image,
    /// Video content (MP4, WebM, 3GP, etc.)
    #[display("video")]
    Video,
    /// Audio content (MP3, OGG, FLAC, etc.)
    #[display("audio")]
    Audio,
}

impl MediaCategory {
    /// Collection name used in managed-store locators.
    pub fn collection(&self) -> &'static str {
        match self {
            MediaCategory::Image => "images",
            MediaCategory::Video => "video",
            MediaCategory::Audio => "audio",
        }
    }

    /// Conventional public directory for this category.
    pub fn default_root(&self) -> &'static str {
        match self {
            MediaCategory::Image => "Pictures",
            MediaCategory::Video => "Movies",
            MediaCategory::Audio => "Music",
        }
    }
}
