//! File type guard: maps image extensions to MIME types.

use std::path::Path;

use crate::error::{Error, Result};

/// Supported image extensions and their MIME types.
pub const MIME_TYPES: &[(&str, &str)] = &[
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
];

/// Detect the MIME type of an image from its extension (case-insensitive).
///
/// Only looks at the path string; the file does not need to exist.
pub fn detect_mime_type(path: impl AsRef<Path>) -> Result<&'static str> {
    let ext = extension_of(path.as_ref());
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .ok_or(Error::UnsupportedFileType(ext))
}

/// Lowercased extension with its leading dot, `""` when there is none.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
