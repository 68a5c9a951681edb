use axum::http::StatusCode;
use axum_test::TestServer;
use gallery_services::{
    config::Config,
    routes,
    share::MockMailer,
    store::{
        Gallery, GalleryStore, GalleryUpdate, MemoryStore, NewGallery, NewPhoto, Photo, StoreError,
    },
};

/// A store whose connectivity can be chosen; everything else is unused here.
#[derive(Clone)]
struct ProbeStore {
    is_connected: bool,
}

fn unused() -> StoreError {
    StoreError::Db("not used by health checks".to_string())
}

impl GalleryStore for ProbeStore {
    async fn is_connected(&self) -> bool {
        self.is_connected
    }

    async fn create_gallery(&self, _input: NewGallery) -> Result<Gallery, StoreError> {
        Err(unused())
    }

    async fn list_galleries(&self) -> Result<Vec<Gallery>, StoreError> {
        Err(unused())
    }

    async fn get_gallery(&self, _id: i64) -> Result<Option<Gallery>, StoreError> {
        Err(unused())
    }

    async fn update_gallery(
        &self,
        _id: i64,
        _changes: GalleryUpdate,
    ) -> Result<Option<Gallery>, StoreError> {
        Err(unused())
    }

    async fn delete_gallery(&self, _id: i64) -> Result<bool, StoreError> {
        Err(unused())
    }

    async fn create_photo(&self, _input: NewPhoto) -> Result<Photo, StoreError> {
        Err(unused())
    }

    async fn list_photos_by_gallery(&self, _gallery_id: i64) -> Result<Vec<Photo>, StoreError> {
        Err(unused())
    }

    async fn get_photo(&self, _id: i64) -> Result<Option<Photo>, StoreError> {
        Err(unused())
    }

    async fn delete_photo(&self, _id: i64) -> Result<bool, StoreError> {
        Err(unused())
    }
}

#[tokio::test]
async fn test_health_check_integration() {
    // Case 1: Connected
    let app_connected = routes(
        ProbeStore { is_connected: true },
        MockMailer::new(),
        Config::new_for_test(),
    );
    let server_connected = TestServer::new(app_connected).unwrap();

    let response = server_connected.get("/is-health").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("OK");
    assert_eq!(response.header("x-service-env"), "local");

    // Case 2: Disconnected
    let app_disconnected = routes(
        ProbeStore {
            is_connected: false,
        },
        MockMailer::new(),
        Config::new_for_test(),
    );
    let server_disconnected = TestServer::new(app_disconnected).unwrap();

    let response = server_disconnected.get("/is-health").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health_check_memory_store() {
    let app = routes(MemoryStore::new(), MockMailer::new(), Config::new_for_test());
    let server = TestServer::new(app).unwrap();

    server.get("/is-health").await.assert_status(StatusCode::OK);
}
