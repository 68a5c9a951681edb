//! Gallery and photo persistence.
//!
//! [`GalleryStore`] is the single contract the rest of the service talks to.
//! Two implementations exist and are chosen at startup:
//!
//! - [`MemoryStore`]: ordered maps behind a lock, for local runs and tests
//! - [`PgStore`]: PostgreSQL through `sqlx`, for anything that must survive a restart
//!
//! Both list galleries and photos newest first.

mod memory;
mod postgres;
mod traits;
mod types;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use traits::GalleryStore;
pub use types::{
    Gallery, GalleryUpdate, NewGallery, NewPhoto, Photo, StoreError, folders_overlap,
};

#[cfg(test)]
mod tests {
    use super::*;

    async fn generic_create<S: GalleryStore>(store: &S, folder: &str) -> Result<Gallery, StoreError> {
        store.create_gallery(NewGallery::new("Generic", folder)).await
    }

    #[tokio::test]
    async fn test_generic_trait_usage() {
        let store = MemoryStore::new();
        let gallery = generic_create(&store, "/generic").await.unwrap();
        assert_eq!(gallery.folder_path, "/generic");
        assert!(store.is_connected().await);
    }
}
