//! Folder and file naming rules.

use super::GalleryError;
use chrono::{DateTime, Utc};

const MAX_FILENAME_CHARS: usize = 200;

/// Canonical form of a gallery folder: `/segment/segment`, no trailing slash.
///
/// `trip-2024/`, `/trip-2024` and `//trip-2024` all normalize to `/trip-2024`,
/// so different spellings cannot alias the same directory. Segments that would
/// escape the upload root are rejected.
pub fn normalize_folder_path(raw: &str) -> Result<String, GalleryError> {
    let raw = raw.trim();
    if raw.contains('\\') || raw.contains('\0') {
        return Err(GalleryError::Validation(
            "Folder path contains invalid characters".to_owned(),
        ));
    }

    let mut normalized = String::with_capacity(raw.len() + 1);
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(GalleryError::Validation(
                "Folder path must not contain '.' or '..' segments".to_owned(),
            ));
        }
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        return Err(GalleryError::Validation(
            "Folder path cannot be empty".to_owned(),
        ));
    }

    Ok(normalized)
}

/// Reduces a client-supplied filename to something safe to put on disk.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return "photo".to_owned();
    }

    let len = cleaned.chars().count();
    if len > MAX_FILENAME_CHARS {
        cleaned.chars().skip(len - MAX_FILENAME_CHARS).collect()
    } else {
        cleaned
    }
}

/// Name a photo is stored under: nanosecond timestamp, `-`, sanitized original.
pub fn stored_filename(now: DateTime<Utc>, original: &str) -> String {
    let stamp = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());
    format!("{stamp}-{}", sanitize_filename(original))
}

/// Upload-relative path of a photo inside its gallery folder.
pub fn photo_path(folder_path: &str, filename: &str) -> String {
    format!("{}/{filename}", folder_path.trim_end_matches('/'))
}
