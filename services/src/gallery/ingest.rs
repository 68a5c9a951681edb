//! Photo ingestion: per-file validation, naming and persistence.

use super::naming::{photo_path, stored_filename};
use super::{GalleryError, GalleryService};
use crate::store::{Gallery, GalleryStore, NewPhoto, Photo};
use chrono::Utc;

/// Largest accepted file, in bytes.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Most files accepted in one upload request.
pub const MAX_FILES_PER_UPLOAD: usize = 50;

pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

const NAME_ATTEMPTS: usize = 5;

/// One file part as received from the client.
///
/// `size` is the number of bytes the client sent. For oversized files the
/// body is not kept, so `data` may be shorter than `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub data: Vec<u8>,
}

impl IncomingFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type,
            size: data.len() as u64,
            data,
        }
    }

    /// A file whose body was counted but not kept, either because it passed
    /// [`MAX_FILE_SIZE`] or because its declared type is not allowed.
    pub fn without_body(
        original_name: impl Into<String>,
        content_type: Option<String>,
        size: u64,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type,
            size,
            data: Vec::new(),
        }
    }
}

/// Why a single file was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("unsupported content type: {}", .0.as_deref().unwrap_or("none"))]
    UnsupportedType(Option<String>),

    #[error("file too large: {size} bytes exceeds {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

/// Canonical allow-listed MIME type for a declared content type.
///
/// Parameters such as `; charset=` and letter case are ignored.
pub fn allowed_mime_type(content_type: Option<&str>) -> Option<&'static str> {
    let essence = content_type?.split(';').next()?.trim().to_ascii_lowercase();
    ALLOWED_MIME_TYPES
        .iter()
        .copied()
        .find(|allowed| *allowed == essence)
}

/// Checks a file against the type allow-list and size limit.
///
/// Returns the canonical MIME type to record.
pub fn validate(file: &IncomingFile) -> Result<&'static str, Rejection> {
    let mime_type = allowed_mime_type(file.content_type.as_deref())
        .ok_or_else(|| Rejection::UnsupportedType(file.content_type.clone()))?;

    if file.size > MAX_FILE_SIZE {
        return Err(Rejection::TooLarge {
            size: file.size,
            max: MAX_FILE_SIZE,
        });
    }

    Ok(mime_type)
}

impl<S: GalleryStore> GalleryService<S> {
    /// Stores every acceptable file in `files` under the gallery's folder.
    ///
    /// Invalid files are skipped. Valid files are persisted one by one; a file
    /// that fails to persist is logged and skipped. Returns the photos that
    /// were created, in input order.
    pub async fn ingest(
        &self,
        gallery_id: i64,
        files: Vec<IncomingFile>,
    ) -> Result<Vec<Photo>, GalleryError> {
        let gallery = self.get_gallery(gallery_id).await?;

        if files.is_empty() {
            return Err(GalleryError::Validation("No files uploaded".to_owned()));
        }
        if files.len() > MAX_FILES_PER_UPLOAD {
            return Err(GalleryError::Validation(format!(
                "Too many files: at most {MAX_FILES_PER_UPLOAD} per upload"
            )));
        }

        let received = files.len();
        let accepted: Vec<(IncomingFile, &'static str)> = files
            .into_iter()
            .filter_map(|file| match validate(&file) {
                Ok(mime_type) => Some((file, mime_type)),
                Err(rejection) => {
                    tracing::warn!(
                        gallery_id,
                        file = %file.original_name,
                        reason = %rejection,
                        "Skipping uploaded file"
                    );
                    None
                }
            })
            .collect();

        if accepted.is_empty() {
            return Err(GalleryError::Validation("No valid files uploaded".to_owned()));
        }

        let mut created = Vec::with_capacity(accepted.len());
        let mut last_error = None;
        for (file, mime_type) in &accepted {
            match self.persist(&gallery, file, mime_type).await {
                Ok(photo) => created.push(photo),
                // The gallery went away mid-batch; nothing after this can succeed.
                Err(e @ GalleryError::NotFound(_)) => {
                    last_error = Some(e);
                    break;
                }
                Err(e) => {
                    tracing::error!(
                        gallery_id,
                        file = %file.original_name,
                        error = %e,
                        "Failed to store uploaded file"
                    );
                    last_error = Some(e);
                }
            }
        }

        if created.is_empty() {
            return Err(last_error.unwrap_or_else(|| {
                GalleryError::Storage("Failed to store uploaded files".to_owned())
            }));
        }

        tracing::info!(
            gallery_id,
            received,
            stored = created.len(),
            "Photos uploaded"
        );
        Ok(created)
    }

    async fn persist(
        &self,
        gallery: &Gallery,
        file: &IncomingFile,
        mime_type: &str,
    ) -> Result<Photo, GalleryError> {
        let disk = self.disk();
        disk.ensure_folder(&gallery.folder_path)
            .await
            .map_err(|e| GalleryError::Storage(format!("Failed to create gallery folder: {e}")))?;

        let (filename, path) = self.free_name(gallery, &file.original_name).await?;

        let written = disk
            .write_file(&path, &file.data)
            .await
            .map_err(|e| GalleryError::Storage(format!("Failed to write {path}: {e}")))?;
        let size = i64::try_from(written)
            .map_err(|_| GalleryError::Storage(format!("File size out of range: {written}")))?;

        let record = NewPhoto {
            gallery_id: gallery.id,
            filename,
            original_name: file.original_name.clone(),
            path: path.clone(),
            size,
            mime_type: mime_type.to_owned(),
        };

        match self.store().create_photo(record).await {
            Ok(photo) => Ok(photo),
            Err(e) => {
                if let Err(cleanup) = disk.remove_file(&path).await {
                    tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned file");
                }
                Err(e.into())
            }
        }
    }

    async fn free_name(
        &self,
        gallery: &Gallery,
        original_name: &str,
    ) -> Result<(String, String), GalleryError> {
        for _ in 0..NAME_ATTEMPTS {
            let filename = stored_filename(Utc::now(), original_name);
            let path = photo_path(&gallery.folder_path, &filename);
            if !self.disk().exists(&path).await {
                return Ok((filename, path));
            }
            tokio::task::yield_now().await;
        }

        Err(GalleryError::Storage(format!(
            "Could not find a free file name for {original_name}"
        )))
    }
}
