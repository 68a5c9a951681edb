//! REST API under `/api`.
//!
//! - `galleries` - gallery CRUD
//! - `photos` - photo listing, multipart upload and removal
//! - `share` - email invitations
//! - `types` - request/response bodies and error mapping

pub mod galleries;
pub mod photos;
pub mod share;
pub mod types;

use crate::gallery::{GalleryService, MAX_FILE_SIZE, MAX_FILES_PER_UPLOAD};
use crate::share::Mailer;
use crate::store::GalleryStore;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Request body cap for uploads: a full batch of maximum-size files plus
/// room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES_PER_UPLOAD * MAX_FILE_SIZE as usize + 1024 * 1024;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState<S, M> {
    pub galleries: GalleryService<S>,
    pub mailer: M,
    pub public_base_url: Option<String>,
}

impl<S, M> AppState<S, M>
where
    S: GalleryStore,
    M: Mailer,
{
    pub fn new(galleries: GalleryService<S>, mailer: M, public_base_url: Option<String>) -> Self {
        Self {
            galleries,
            mailer,
            public_base_url,
        }
    }
}

pub fn routes<S, M>() -> Router<AppState<S, M>>
where
    S: GalleryStore,
    M: Mailer,
{
    Router::new()
        .route(
            "/galleries",
            get(galleries::list::<S, M>).post(galleries::create::<S, M>),
        )
        .route(
            "/galleries/{id}",
            get(galleries::get::<S, M>)
                .patch(galleries::update::<S, M>)
                .delete(galleries::delete::<S, M>),
        )
        .route(
            "/galleries/{id}/photos",
            get(photos::list::<S, M>)
                .post(photos::upload::<S, M>)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/photos/{id}",
            get(photos::get::<S, M>).delete(photos::delete::<S, M>),
        )
        .route("/share", post(share::send::<S, M>))
}
