//! Containment checks for names joined onto storage paths.

use std::path::{Component, Path};

/// `relative` consists only of plain folder names, so joining it onto a
/// directory cannot leave that directory.
pub(crate) fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
}

/// `name` is a single non-empty path component.
pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(std::path::is_separator) && is_contained(Path::new(name))
}
