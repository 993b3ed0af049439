//! Advisory MIME type <-> filename extension mapping.
//!
//! Lookups never fail: a miss is reported as `None` and callers degrade to an
//! unmodified name or to [`MIME_WILDCARD`].

/// Wildcard MIME type, used when the type is unknown.
pub const MIME_WILDCARD: &str = "*/*";

/// Extensions preferred over the first registry entry for common media types.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
    ("image/heif", "heif"),
    ("image/bmp", "bmp"),
    ("image/svg+xml", "svg"),
    ("video/mp4", "mp4"),
    ("video/webm", "webm"),
    ("video/3gpp", "3gp"),
    ("video/x-matroska", "mkv"),
    ("video/quicktime", "mov"),
    ("audio/mpeg", "mp3"),
    ("audio/ogg", "ogg"),
    ("audio/wav", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/aac", "aac"),
    ("audio/flac", "flac"),
    ("audio/mp4", "m4a"),
    ("text/plain", "txt"),
    ("application/pdf", "pdf"),
];

/// Filename extension (without the dot) for a MIME type.
///
/// Parameters such as `; charset=utf-8` are ignored and matching is
/// case-insensitive. Wildcard types have no extension.
///
/// # Examples
///
/// ```
/// use flipper_core::extension_for_mime;
///
/// assert_eq!(extension_for_mime("image/jpeg"), Some("jpg"));
/// assert_eq!(extension_for_mime("Image/PNG"), Some("png"));
/// assert_eq!(extension_for_mime("*/*"), None);
/// assert_eq!(extension_for_mime("application/x-flipper-unknown"), None);
/// ```
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let (top, sub) = essence.split_once('/')?;
    if top.is_empty() || sub.is_empty() || top == "*" || sub == "*" {
        return None;
    }

    PREFERRED_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
        .or_else(|| {
            mime_guess::get_mime_extensions_str(&essence).and_then(|exts| exts.first().copied())
        })
}

/// MIME type for a filename extension, with or without the leading dot.
///
/// # Examples
///
/// ```
/// use flipper_core::mime_for_extension;
///
/// assert_eq!(mime_for_extension("png"), Some("image/png"));
/// assert_eq!(mime_for_extension(".mp4"), Some("video/mp4"));
/// assert_eq!(mime_for_extension(""), None);
/// ```
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return None;
    }
    mime_guess::from_ext(extension).first_raw()
}

/// Split a display name into a stem and the extension implied by `mime_type`.
///
/// A trailing extension that already names the same type is dropped from the
/// stem, so `photo.png` and `photo` both give `("photo", Some("png"))`.
///
/// # Examples
///
/// ```
/// use flipper_core::split_extension;
///
/// assert_eq!(split_extension("photo.png", "image/png"), ("photo", Some("png")));
/// assert_eq!(split_extension("photo.JPEG", "image/jpeg"), ("photo", Some("jpg")));
/// assert_eq!(split_extension("report.draft", "image/png"), ("report.draft", Some("png")));
/// assert_eq!(split_extension("notes", "*/*"), ("notes", None));
/// ```
pub fn split_extension<'a>(
    display_name: &'a str,
    mime_type: &str,
) -> (&'a str, Option<&'static str>) {
    let Some(ext) = extension_for_mime(mime_type) else {
        return (display_name, None);
    };

    let stem = match display_name.rsplit_once('.') {
        Some((stem, tail))
            if !stem.is_empty()
                && (tail.eq_ignore_ascii_case(ext)
                    || mime_for_extension(tail).and_then(extension_for_mime) == Some(ext)) =>
        {
            stem
        }
        _ => display_name,
    };
    (stem, Some(ext))
}
