//! Gallery lifecycle on top of a [`GalleryStore`] and the upload directory.
//!
//! The store owns the records and the disk owns the bytes. [`GalleryService`]
//! keeps the two in step: a gallery gets its folder before its record, and a
//! deleted gallery or photo takes its files with it.

mod error;
mod ingest;
pub mod naming;
mod seed;

pub use error::GalleryError;
pub use ingest::{
    ALLOWED_MIME_TYPES, IncomingFile, MAX_FILE_SIZE, MAX_FILES_PER_UPLOAD, Rejection,
    allowed_mime_type, validate,
};
pub use seed::seed_demo_galleries;

use crate::disk::LocalDisk;
use crate::store::{Gallery, GalleryStore, GalleryUpdate, NewGallery, Photo};

#[derive(Debug, Clone)]
pub struct GalleryService<S> {
    store: S,
    disk: LocalDisk,
}

impl<S: GalleryStore> GalleryService<S> {
    pub fn new(store: S, disk: LocalDisk) -> Self {
        Self { store, disk }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn disk(&self) -> &LocalDisk {
        &self.disk
    }

    /// Provisions the gallery folder, then records the gallery.
    ///
    /// If the folder cannot be created no record is written. If the record is
    /// refused, a folder created here is removed again.
    pub async fn create_gallery(&self, input: NewGallery) -> Result<Gallery, GalleryError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(GalleryError::Validation("Name is required".to_owned()));
        }
        let folder_path = naming::normalize_folder_path(&input.folder_path)?;
        let description = input
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        let existed = self.disk.exists(&folder_path).await;
        if let Err(e) = self.disk.ensure_folder(&folder_path).await {
            tracing::error!(folder = %folder_path, error = %e, "Failed to create gallery folder");
            return Err(GalleryError::Storage(format!(
                "Failed to create gallery folder: {e}"
            )));
        }

        let created = self
            .store
            .create_gallery(NewGallery {
                name: name.to_owned(),
                folder_path: folder_path.clone(),
                description,
                is_public: input.is_public,
                allow_download: input.allow_download,
            })
            .await;

        let gallery = match created {
            Ok(gallery) => gallery,
            Err(e) => {
                if !existed {
                    if let Err(cleanup) = self.disk.remove_folder(&folder_path).await {
                        tracing::warn!(
                            folder = %folder_path,
                            error = %cleanup,
                            "Failed to remove unused gallery folder"
                        );
                    }
                }
                return Err(e.into());
            }
        };

        tracing::info!(gallery_id = gallery.id, folder = %gallery.folder_path, "Gallery created");
        Ok(gallery)
    }

    pub async fn list_galleries(&self) -> Result<Vec<Gallery>, GalleryError> {
        Ok(self.store.list_galleries().await?)
    }

    pub async fn get_gallery(&self, id: i64) -> Result<Gallery, GalleryError> {
        self.store
            .get_gallery(id)
            .await?
            .ok_or_else(GalleryError::gallery_not_found)
    }

    pub async fn update_gallery(
        &self,
        id: i64,
        mut changes: GalleryUpdate,
    ) -> Result<Gallery, GalleryError> {
        if let Some(name) = changes.name.take() {
            let name = name.trim();
            if name.is_empty() {
                return Err(GalleryError::Validation("Name cannot be empty".to_owned()));
            }
            changes.name = Some(name.to_owned());
        }

        if changes.is_empty() {
            return self.get_gallery(id).await;
        }

        self.store
            .update_gallery(id, changes)
            .await?
            .ok_or_else(GalleryError::gallery_not_found)
    }

    /// Removes the gallery folder and then the gallery with all its photos.
    ///
    /// A folder that cannot be removed is logged and does not block the delete.
    pub async fn delete_gallery(&self, id: i64) -> Result<(), GalleryError> {
        let gallery = self.get_gallery(id).await?;

        if let Err(e) = self.disk.remove_folder(&gallery.folder_path).await {
            tracing::warn!(
                gallery_id = id,
                folder = %gallery.folder_path,
                error = %e,
                "Failed to remove gallery folder"
            );
        }

        if !self.store.delete_gallery(id).await? {
            return Err(GalleryError::gallery_not_found());
        }

        tracing::info!(gallery_id = id, "Gallery deleted");
        Ok(())
    }

    pub async fn list_photos(&self, gallery_id: i64) -> Result<Vec<Photo>, GalleryError> {
        Ok(self.store.list_photos_by_gallery(gallery_id).await?)
    }

    pub async fn get_photo(&self, id: i64) -> Result<Photo, GalleryError> {
        self.store
            .get_photo(id)
            .await?
            .ok_or_else(GalleryError::photo_not_found)
    }

    /// Removes the photo file and then its record.
    pub async fn delete_photo(&self, id: i64) -> Result<(), GalleryError> {
        let photo = self.get_photo(id).await?;

        if let Err(e) = self.disk.remove_file(&photo.path).await {
            tracing::warn!(photo_id = id, path = %photo.path, error = %e, "Failed to remove photo file");
        }

        if !self.store.delete_photo(id).await? {
            return Err(GalleryError::photo_not_found());
        }

        Ok(())
    }
}
