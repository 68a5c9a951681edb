use super::{GalleryError, GalleryService};
use crate::store::{GalleryStore, NewGallery};

/// Creates the demo galleries when the store holds none.
///
/// Returns how many galleries were created.
pub async fn seed_demo_galleries<S: GalleryStore>(
    service: &GalleryService<S>,
) -> Result<usize, GalleryError> {
    if !service.list_galleries().await?.is_empty() {
        tracing::debug!("Store already has galleries, skipping demo data");
        return Ok(0);
    }

    // Oldest first, so newest-first listings show Wedding, Vacation, Family.
    let demo = [
        NewGallery::new("Family Portraits", "/photos/family-2024")
            .with_description("Annual family portrait session")
            .with_public(false)
            .with_allow_download(true),
        NewGallery::new("Vacation Photos", "/photos/vacation-2024")
            .with_description("Summer vacation memories")
            .with_public(false)
            .with_allow_download(true),
        NewGallery::new("Wedding Photos", "/photos/wedding-2024")
            .with_description("Beautiful moments from Sarah & John's wedding day")
            .with_public(true)
            .with_allow_download(true),
    ];

    let count = demo.len();
    for gallery in demo {
        service.create_gallery(gallery).await?;
    }

    tracing::info!(count, "Seeded demo galleries");
    Ok(count)
}
