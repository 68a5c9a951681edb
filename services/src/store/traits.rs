//! Store trait definition.

use super::types::{Gallery, GalleryUpdate, NewGallery, NewPhoto, Photo, StoreError};
use std::future::Future;

/// Persistence for galleries and their photos.
///
/// Implementations must behave identically from the caller's side: ids are
/// assigned by the store and never reused, folder paths are unique, both list
/// operations return newest records first, and deleting a gallery removes its
/// photos.
pub trait GalleryStore: Clone + Send + Sync + 'static {
    /// Returns true when the backing store can serve requests.
    fn is_connected(&self) -> impl Future<Output = bool> + Send;

    /// Inserts a gallery, applying `is_public = false` and
    /// `allow_download = true` when unset.
    ///
    /// Fails with [`StoreError::FolderPathTaken`] when another gallery already
    /// owns the folder, and with [`StoreError::FolderPathOverlaps`] when the
    /// folder would contain, or sit inside, another gallery's folder.
    fn create_gallery(
        &self,
        input: NewGallery,
    ) -> impl Future<Output = Result<Gallery, StoreError>> + Send;

    fn list_galleries(&self) -> impl Future<Output = Result<Vec<Gallery>, StoreError>> + Send;

    fn get_gallery(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Gallery>, StoreError>> + Send;

    /// Merges the provided fields; `Ok(None)` when the gallery does not exist.
    fn update_gallery(
        &self,
        id: i64,
        changes: GalleryUpdate,
    ) -> impl Future<Output = Result<Option<Gallery>, StoreError>> + Send;

    /// Removes the gallery and every photo that belongs to it.
    ///
    /// Returns whether a gallery was actually removed.
    fn delete_gallery(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Fails with [`StoreError::GalleryMissing`] when the owning gallery is gone
    /// and [`StoreError::PhotoPathTaken`] when another photo has the same path.
    fn create_photo(&self, input: NewPhoto)
    -> impl Future<Output = Result<Photo, StoreError>> + Send;

    fn list_photos_by_gallery(
        &self,
        gallery_id: i64,
    ) -> impl Future<Output = Result<Vec<Photo>, StoreError>> + Send;

    fn get_photo(&self, id: i64) -> impl Future<Output = Result<Option<Photo>, StoreError>> + Send;

    fn delete_photo(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
