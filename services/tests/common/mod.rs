//! Shared test utilities for integration tests.
//!
//! Every [`TestApp`] gets its own in-memory store, a recording mailer and a
//! temporary upload root that is removed when the app is dropped.

use axum_test::TestServer;
use axum_test::multipart::Part;
use gallery_services::{
    config::Config,
    routes,
    share::MockMailer,
    store::{Gallery, MemoryStore},
};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// Base URL configured for share links in tests.
#[allow(dead_code)]
pub const TEST_BASE_URL: &str = "https://photos.test";

pub struct TestApp {
    pub server: TestServer,
    #[allow(dead_code)]
    pub store: MemoryStore,
    #[allow(dead_code)]
    pub mailer: MockMailer,
    upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(MockMailer::new())
    }

    pub fn with_mailer(mailer: MockMailer) -> Self {
        let upload_dir = TempDir::new().expect("temp upload dir");
        let store = MemoryStore::new();
        let config = Config::new_for_test()
            .with_upload_dir(upload_dir.path())
            .with_public_base_url(TEST_BASE_URL);

        let app = routes(store.clone(), mailer.clone(), config);
        let server = TestServer::new(app).unwrap();

        Self {
            server,
            store,
            mailer,
            upload_dir,
        }
    }

    #[allow(dead_code)]
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Creates a gallery through the API and returns it.
    #[allow(dead_code)]
    pub async fn create_gallery(&self, name: &str, folder_path: &str) -> Gallery {
        let response = self
            .server
            .post("/api/galleries")
            .json(&json!({ "name": name, "folderPath": folder_path }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Gallery>()
    }
}

/// Bytes that start with a PNG signature, padded to `len`.
#[allow(dead_code)]
pub fn png_bytes(len: usize) -> Vec<u8> {
    const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let mut bytes = SIGNATURE.to_vec();
    bytes.resize(len.max(SIGNATURE.len()), 0xab);
    bytes
}

/// A file part for the `photos` field.
#[allow(dead_code)]
pub fn file_part(name: &str, mime_type: &str, bytes: Vec<u8>) -> Part {
    Part::bytes(bytes).file_name(name).mime_type(mime_type)
}
