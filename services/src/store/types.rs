//! Gallery and photo records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named collection of photos backed by one upload folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub id: i64,
    pub name: String,
    /// Normalized folder under the upload root, always starting with `/`.
    pub folder_path: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub allow_download: bool,
    pub created_at: DateTime<Utc>,
}

/// A single uploaded image owned by a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i64,
    pub gallery_id: i64,
    /// Name on disk.
    pub filename: String,
    /// Name the client uploaded the file under.
    pub original_name: String,
    /// Upload-root relative path: gallery folder joined with `filename`.
    pub path: String,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

/// True when `a` and `b` are the same folder or one sits inside the other.
///
/// Both must be normalized (`/a/b`, no trailing slash). `/photos` overlaps
/// `/photos/2024` but not `/photos-2024`.
pub fn folders_overlap(a: &str, b: &str) -> bool {
    fn contains(outer: &str, inner: &str) -> bool {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    a == b || contains(a, b) || contains(b, a)
}

/// Input for [`GalleryStore::create_gallery`](super::GalleryStore::create_gallery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGallery {
    pub name: String,
    pub folder_path: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub allow_download: Option<bool>,
}

impl NewGallery {
    pub fn new(name: impl Into<String>, folder_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder_path: folder_path.into(),
            description: None,
            is_public: None,
            allow_download: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn with_allow_download(mut self, allow_download: bool) -> Self {
        self.allow_download = Some(allow_download);
        self
    }
}

/// Partial update of a gallery. `None` leaves the field untouched.
///
/// The folder path is deliberately absent: it is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub allow_download: Option<bool>,
}

impl GalleryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_public.is_none()
            && self.allow_download.is_none()
    }
}

/// Input for [`GalleryStore::create_photo`](super::GalleryStore::create_photo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub gallery_id: i64,
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size: i64,
    pub mime_type: String,
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Folder path already in use: {0}")]
    FolderPathTaken(String),

    #[error("Folder path {path} overlaps gallery folder {existing}")]
    FolderPathOverlaps { path: String, existing: String },

    #[error("Photo path already in use: {0}")]
    PhotoPathTaken(String),

    #[error("Gallery not found: {0}")]
    GalleryMissing(i64),

    #[error("Database error: {0}")]
    Db(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}
