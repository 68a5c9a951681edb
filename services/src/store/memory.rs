//! In-memory gallery store.

use super::traits::GalleryStore;
use super::types::{
    Gallery, GalleryUpdate, NewGallery, NewPhoto, Photo, StoreError, folders_overlap,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Map-backed implementation of [`GalleryStore`].
///
/// Everything lives behind one lock so the folder uniqueness check, id
/// assignment and cascade deletes are atomic with respect to each other.
/// Cloning shares the same data. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    galleries: BTreeMap<i64, Gallery>,
    photos: BTreeMap<i64, Photo>,
    last_gallery_id: i64,
    last_photo_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gallery_count(&self) -> usize {
        self.state.read().expect("lock poisoned").galleries.len()
    }

    pub fn photo_count(&self) -> usize {
        self.state.read().expect("lock poisoned").photos.len()
    }
}

impl GalleryStore for MemoryStore {
    async fn is_connected(&self) -> bool {
        true
    }

    async fn create_gallery(&self, input: NewGallery) -> Result<Gallery, StoreError> {
        let mut state = self.state.write().expect("lock poisoned");

        if let Some(existing) = state
            .galleries
            .values()
            .find(|g| folders_overlap(&g.folder_path, &input.folder_path))
        {
            if existing.folder_path == input.folder_path {
                return Err(StoreError::FolderPathTaken(input.folder_path));
            }
            return Err(StoreError::FolderPathOverlaps {
                path: input.folder_path,
                existing: existing.folder_path.clone(),
            });
        }

        state.last_gallery_id += 1;
        let gallery = Gallery {
            id: state.last_gallery_id,
            name: input.name,
            folder_path: input.folder_path,
            description: input.description,
            is_public: input.is_public.unwrap_or(false),
            allow_download: input.allow_download.unwrap_or(true),
            created_at: Utc::now(),
        };

        state.galleries.insert(gallery.id, gallery.clone());
        Ok(gallery)
    }

    async fn list_galleries(&self) -> Result<Vec<Gallery>, StoreError> {
        let state = self.state.read().expect("lock poisoned");
        let mut galleries: Vec<Gallery> = state.galleries.values().cloned().collect();
        galleries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(galleries)
    }

    async fn get_gallery(&self, id: i64) -> Result<Option<Gallery>, StoreError> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.galleries.get(&id).cloned())
    }

    async fn update_gallery(
        &self,
        id: i64,
        changes: GalleryUpdate,
    ) -> Result<Option<Gallery>, StoreError> {
        let mut state = self.state.write().expect("lock poisoned");

        let Some(gallery) = state.galleries.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            gallery.name = name;
        }
        if let Some(description) = changes.description {
            gallery.description = Some(description);
        }
        if let Some(is_public) = changes.is_public {
            gallery.is_public = is_public;
        }
        if let Some(allow_download) = changes.allow_download {
            gallery.allow_download = allow_download;
        }

        Ok(Some(gallery.clone()))
    }

    async fn delete_gallery(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.write().expect("lock poisoned");
        state.photos.retain(|_, photo| photo.gallery_id != id);
        Ok(state.galleries.remove(&id).is_some())
    }

    async fn create_photo(&self, input: NewPhoto) -> Result<Photo, StoreError> {
        let mut state = self.state.write().expect("lock poisoned");

        if !state.galleries.contains_key(&input.gallery_id) {
            return Err(StoreError::GalleryMissing(input.gallery_id));
        }
        if state.photos.values().any(|p| p.path == input.path) {
            return Err(StoreError::PhotoPathTaken(input.path));
        }

        state.last_photo_id += 1;
        let photo = Photo {
            id: state.last_photo_id,
            gallery_id: input.gallery_id,
            filename: input.filename,
            original_name: input.original_name,
            path: input.path,
            size: input.size,
            mime_type: input.mime_type,
            created_at: Utc::now(),
        };

        state.photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn list_photos_by_gallery(&self, gallery_id: i64) -> Result<Vec<Photo>, StoreError> {
        let state = self.state.read().expect("lock poisoned");
        let mut photos: Vec<Photo> = state
            .photos
            .values()
            .filter(|photo| photo.gallery_id == gallery_id)
            .cloned()
            .collect();
        photos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(photos)
    }

    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, StoreError> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.photos.get(&id).cloned())
    }

    async fn delete_photo(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.write().expect("lock poisoned");
        Ok(state.photos.remove(&id).is_some())
    }
}
