//! Photo listing, upload and removal.

use super::AppState;
use super::types::{SuccessResponse, parse_id};
use crate::gallery::{
    GalleryError, IncomingFile, MAX_FILE_SIZE, MAX_FILES_PER_UPLOAD, allowed_mime_type,
};
use crate::share::Mailer;
use crate::store::{GalleryStore, Photo};
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{Field, MultipartError, MultipartRejection},
    },
    http::StatusCode,
};

/// Multipart field that carries the image files.
pub const PHOTOS_FIELD: &str = "photos";

fn multipart_error(e: MultipartError) -> GalleryError {
    GalleryError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}

pub async fn list<S, M>(
    State(state): State<AppState<S, M>>,
    Path(gallery_id): Path<String>,
) -> Result<Json<Vec<Photo>>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let gallery_id = parse_id(&gallery_id, "gallery")?;
    Ok(Json(state.galleries.list_photos(gallery_id).await?))
}

/// Accepts up to [`MAX_FILES_PER_UPLOAD`] files in the `photos` field.
///
/// The gallery is resolved before any part is read, so an unknown gallery
/// never costs a full body read.
pub async fn upload<S, M>(
    State(state): State<AppState<S, M>>,
    Path(gallery_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<Photo>>), GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let gallery_id = parse_id(&gallery_id, "gallery")?;
    state.galleries.get_gallery(gallery_id).await?;

    let mut multipart =
        multipart.map_err(|e| GalleryError::Validation(e.body_text()))?;

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PHOTOS_FIELD) {
            continue;
        }
        if files.len() == MAX_FILES_PER_UPLOAD {
            return Err(GalleryError::Validation(format!(
                "Too many files: at most {MAX_FILES_PER_UPLOAD} per upload"
            )));
        }
        files.push(read_file(field).await?);
    }

    let photos = state.galleries.ingest(gallery_id, files).await?;
    Ok((StatusCode::CREATED, Json(photos)))
}

/// Accumulates one file part, keeping at most [`MAX_FILE_SIZE`] bytes.
///
/// A part whose declared type is not allowed, or that runs past the limit, is
/// only counted so it can still be reported and skipped.
struct PartBuffer {
    keep: bool,
    size: u64,
    data: Vec<u8>,
}

impl PartBuffer {
    fn new(content_type: Option<&str>) -> Self {
        Self {
            keep: allowed_mime_type(content_type).is_some(),
            size: 0,
            data: Vec::new(),
        }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.size += chunk.len() as u64;
        if self.keeps_body() {
            self.data.extend_from_slice(chunk);
        } else if !self.data.is_empty() {
            self.data = Vec::new();
        }
    }

    fn keeps_body(&self) -> bool {
        self.keep && self.size <= MAX_FILE_SIZE
    }

    fn finish(self, original_name: String, content_type: Option<String>) -> IncomingFile {
        if self.keeps_body() {
            IncomingFile::new(original_name, content_type, self.data)
        } else {
            IncomingFile::without_body(original_name, content_type, self.size)
        }
    }
}

async fn read_file(mut field: Field<'_>) -> Result<IncomingFile, GalleryError> {
    let original_name = field.file_name().unwrap_or("photo").to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut buffer = PartBuffer::new(content_type.as_deref());
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        buffer.push(&chunk);
    }

    Ok(buffer.finish(original_name, content_type))
}

pub async fn get<S, M>(
    State(state): State<AppState<S, M>>,
    Path(id): Path<String>,
) -> Result<Json<Photo>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let id = parse_id(&id, "photo")?;
    Ok(Json(state.galleries.get_photo(id).await?))
}

pub async fn delete<S, M>(
    State(state): State<AppState<S, M>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let id = parse_id(&id, "photo")?;
    state.galleries.delete_photo(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::{Rejection, validate};

    #[test]
    fn test_disallowed_part_is_counted_not_kept() {
        let mut buffer = PartBuffer::new(Some("application/zip"));
        let chunk = vec![0u8; 1024 * 1024];
        for _ in 0..8 {
            buffer.push(&chunk);
            assert!(buffer.data.is_empty());
        }

        let file = buffer.finish("archive.zip".to_owned(), Some("application/zip".to_owned()));
        assert_eq!(file.size, 8 * 1024 * 1024);
        assert!(file.data.is_empty());
        assert!(matches!(validate(&file), Err(Rejection::UnsupportedType(_))));

        let mut untyped = PartBuffer::new(None);
        untyped.push(b"hello");
        assert!(untyped.data.is_empty());
    }

    #[test]
    fn test_allowed_part_kept_until_limit() {
        let mut buffer = PartBuffer::new(Some("Image/PNG"));
        buffer.push(&[1; 10]);
        buffer.push(&[2; 6]);
        let file = buffer.finish("a.png".to_owned(), Some("Image/PNG".to_owned()));
        assert_eq!(file.size, 16);
        assert_eq!(file.data.len(), 16);
        assert_eq!(validate(&file), Ok("image/png"));

        let mut big = PartBuffer::new(Some("image/png"));
        big.push(&vec![0u8; MAX_FILE_SIZE as usize]);
        assert_eq!(big.data.len() as u64, MAX_FILE_SIZE);
        big.push(&[0]);
        assert!(big.data.is_empty());
        let file = big.finish("big.png".to_owned(), Some("image/png".to_owned()));
        assert!(matches!(validate(&file), Err(Rejection::TooLarge { .. })));
    }
}
