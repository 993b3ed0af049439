//! Seam to the host's document resolver.

use crate::Locator;

/// What a [`DocumentResolver`] knows about an existing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// Handle the document can be addressed by
    pub locator: Locator,
    /// Display name reported by the host, if any
    pub name: Option<String>,
    /// MIME type reported by the host, if any
    pub mime_type: Option<String>,
    /// Whether the document is a regular file (not a directory)
    pub is_file: bool,
}

/// Turns an opaque file reference into document metadata.
///
/// Implemented by the host environment; Flipper only consumes it.
pub trait DocumentResolver {
    /// Resolve `reference`, or `None` if it does not name a document.
    fn resolve(&self, reference: &str) -> Option<ResolvedDocument>;
}
