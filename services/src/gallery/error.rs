use crate::store::StoreError;

/// Failures surfaced by gallery and photo operations.
///
/// Each variant maps onto one HTTP status in the API layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The referenced gallery or photo does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The folder path is owned by, or nested with, another gallery's folder.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected store or file-system failure.
    #[error("{0}")]
    Storage(String),
}

impl GalleryError {
    pub fn gallery_not_found() -> Self {
        Self::NotFound("Gallery not found".to_owned())
    }

    pub fn photo_not_found() -> Self {
        Self::NotFound("Photo not found".to_owned())
    }
}

impl From<StoreError> for GalleryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FolderPathTaken(path) => {
                Self::Conflict(format!("Folder path already in use: {path}"))
            }
            StoreError::FolderPathOverlaps { path, existing } => Self::Conflict(format!(
                "Folder path {path} overlaps existing gallery folder {existing}"
            )),
            StoreError::PhotoPathTaken(path) => {
                Self::Conflict(format!("Photo path already in use: {path}"))
            }
            StoreError::GalleryMissing(_) => Self::gallery_not_found(),
            StoreError::Db(message) => Self::Storage(message),
        }
    }
}
