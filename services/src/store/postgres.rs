//! PostgreSQL gallery store.

use super::traits::GalleryStore;
use super::types::{Gallery, GalleryUpdate, NewGallery, NewPhoto, Photo, StoreError};
use sqlx::postgres::{PgPool, PgPoolOptions};

const GALLERY_COLUMNS: &str =
    "id, name, folder_path, description, is_public, allow_download, created_at";

const PHOTO_COLUMNS: &str =
    "id, gallery_id, filename, original_name, path, size, mime_type, created_at";

/// Durable implementation of [`GalleryStore`] on top of a `sqlx` pool.
///
/// Schema lives in `services/migrations` and is applied by [`PgStore::migrate`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `database_url`.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;

        tracing::info!("Database connection pool established");

        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl GalleryStore for PgStore {
    async fn is_connected(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn create_gallery(&self, input: NewGallery) -> Result<Gallery, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Serializes creators so two overlapping folders cannot both pass the check.
        sqlx::query("LOCK TABLE galleries IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT folder_path FROM galleries \
             WHERE folder_path = $1 \
                OR starts_with(folder_path, $1 || '/') \
                OR starts_with($1, folder_path || '/') \
             ORDER BY (folder_path = $1) DESC \
             LIMIT 1",
        )
        .bind(&input.folder_path)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(existing) = existing {
            if existing == input.folder_path {
                return Err(StoreError::FolderPathTaken(input.folder_path));
            }
            return Err(StoreError::FolderPathOverlaps {
                path: input.folder_path,
                existing,
            });
        }

        let sql = format!(
            "INSERT INTO galleries (name, folder_path, description, is_public, allow_download) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {GALLERY_COLUMNS}"
        );

        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(&input.name)
            .bind(&input.folder_path)
            .bind(&input.description)
            .bind(input.is_public.unwrap_or(false))
            .bind(input.allow_download.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::FolderPathTaken(input.folder_path.clone())
                }
                other => StoreError::from(other),
            })?;

        tx.commit().await?;

        Ok(gallery)
    }

    async fn list_galleries(&self) -> Result<Vec<Gallery>, StoreError> {
        let sql = format!("SELECT {GALLERY_COLUMNS} FROM galleries ORDER BY created_at DESC, id DESC");

        let galleries = sqlx::query_as::<_, Gallery>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(galleries)
    }

    async fn get_gallery(&self, id: i64) -> Result<Option<Gallery>, StoreError> {
        let sql = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE id = $1");

        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(gallery)
    }

    async fn update_gallery(
        &self,
        id: i64,
        changes: GalleryUpdate,
    ) -> Result<Option<Gallery>, StoreError> {
        let sql = format!(
            "UPDATE galleries SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 is_public = COALESCE($4, is_public), \
                 allow_download = COALESCE($5, allow_download) \
             WHERE id = $1 \
             RETURNING {GALLERY_COLUMNS}"
        );

        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.description)
            .bind(changes.is_public)
            .bind(changes.allow_download)
            .fetch_optional(&self.pool)
            .await?;

        Ok(gallery)
    }

    async fn delete_gallery(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Photos first so the foreign key never blocks the gallery delete.
        sqlx::query("DELETE FROM photos WHERE gallery_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM galleries WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_photo(&self, input: NewPhoto) -> Result<Photo, StoreError> {
        let sql = format!(
            "INSERT INTO photos (gallery_id, filename, original_name, path, size, mime_type) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PHOTO_COLUMNS}"
        );

        sqlx::query_as::<_, Photo>(&sql)
            .bind(input.gallery_id)
            .bind(&input.filename)
            .bind(&input.original_name)
            .bind(&input.path)
            .bind(input.size)
            .bind(&input.mime_type)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    StoreError::GalleryMissing(input.gallery_id)
                }
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::PhotoPathTaken(input.path.clone())
                }
                other => StoreError::from(other),
            })
    }

    async fn list_photos_by_gallery(&self, gallery_id: i64) -> Result<Vec<Photo>, StoreError> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE gallery_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );

        let photos = sqlx::query_as::<_, Photo>(&sql)
            .bind(gallery_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(photos)
    }

    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, StoreError> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");

        let photo = sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(photo)
    }

    async fn delete_photo(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Needs a live database; run with `cargo test -- --ignored` and DATABASE_URL set.
    async fn setup() -> PgStore {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgStore::new(
            PgPoolOptions::new()
                .max_connections(1)
                .connect(&database_url)
                .await
                .expect("Failed to create pool."),
        );
        store.migrate().await.expect("migrations should apply");

        sqlx::query("DELETE FROM photos")
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM galleries")
            .execute(store.pool())
            .await
            .unwrap();

        store
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_get_and_conflict() {
        let store = setup().await;

        let gallery = store
            .create_gallery(NewGallery::new("Trip", "/trip-2024").with_public(true))
            .await
            .unwrap();
        assert!(gallery.is_public);
        assert!(gallery.allow_download);

        let fetched = store.get_gallery(gallery.id).await.unwrap();
        assert_eq!(fetched, Some(gallery));

        let duplicate = store
            .create_gallery(NewGallery::new("Again", "/trip-2024"))
            .await;
        assert!(matches!(duplicate, Err(StoreError::FolderPathTaken(_))));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_gallery_rejects_nested_folders() {
        let store = setup().await;
        store
            .create_gallery(NewGallery::new("Wedding", "/photos/wedding-2024"))
            .await
            .unwrap();

        let parent = store.create_gallery(NewGallery::new("All", "/photos")).await;
        assert_eq!(
            parent,
            Err(StoreError::FolderPathOverlaps {
                path: "/photos".to_owned(),
                existing: "/photos/wedding-2024".to_owned(),
            })
        );

        let child = store
            .create_gallery(NewGallery::new("Day one", "/photos/wedding-2024/day-1"))
            .await;
        assert!(matches!(child, Err(StoreError::FolderPathOverlaps { .. })));

        store
            .create_gallery(NewGallery::new("Sibling", "/photos/wedding"))
            .await
            .unwrap();
        assert_eq!(store.list_galleries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_gallery_cascades() {
        let store = setup().await;
        let gallery = store
            .create_gallery(NewGallery::new("G", "/g"))
            .await
            .unwrap();

        for name in ["a.png", "b.png"] {
            store
                .create_photo(NewPhoto {
                    gallery_id: gallery.id,
                    filename: format!("1-{name}"),
                    original_name: name.to_owned(),
                    path: format!("/g/1-{name}"),
                    size: 3,
                    mime_type: "image/png".to_owned(),
                })
                .await
                .unwrap();
        }

        assert!(store.delete_gallery(gallery.id).await.unwrap());
        assert!(
            store
                .list_photos_by_gallery(gallery.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(!store.delete_gallery(gallery.id).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_photo_for_missing_gallery() {
        let store = setup().await;
        let result = store
            .create_photo(NewPhoto {
                gallery_id: 999_999,
                filename: "1-x.png".to_owned(),
                original_name: "x.png".to_owned(),
                path: "/nowhere/1-x.png".to_owned(),
                size: 1,
                mime_type: "image/png".to_owned(),
            })
            .await;
        assert_eq!(result, Err(StoreError::GalleryMissing(999_999)));
    }
}
