//! /api/galleries endpoint handlers.

use super::AppState;
use super::types::{
    CreateGalleryRequest, SuccessResponse, UpdateGalleryRequest, parse_id,
};
use crate::gallery::GalleryError;
use crate::share::Mailer;
use crate::store::{Gallery, GalleryStore, GalleryUpdate, NewGallery};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

pub async fn list<S, M>(
    State(state): State<AppState<S, M>>,
) -> Result<Json<Vec<Gallery>>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    Ok(Json(state.galleries.list_galleries().await?))
}

pub async fn get<S, M>(
    State(state): State<AppState<S, M>>,
    Path(id): Path<String>,
) -> Result<Json<Gallery>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let id = parse_id(&id, "gallery")?;
    Ok(Json(state.galleries.get_gallery(id).await?))
}

pub async fn create<S, M>(
    State(state): State<AppState<S, M>>,
    payload: Result<Json<CreateGalleryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Gallery>), GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let Json(payload) = payload.map_err(|e| GalleryError::Validation(e.body_text()))?;

    let gallery = state
        .galleries
        .create_gallery(NewGallery {
            name: payload.name,
            folder_path: payload.folder_path,
            description: payload.description,
            is_public: payload.is_public,
            allow_download: payload.allow_download,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(gallery)))
}

pub async fn update<S, M>(
    State(state): State<AppState<S, M>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGalleryRequest>, JsonRejection>,
) -> Result<Json<Gallery>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let id = parse_id(&id, "gallery")?;
    let Json(payload) = payload.map_err(|e| GalleryError::Validation(e.body_text()))?;

    if payload.folder_path.is_some() {
        return Err(GalleryError::Validation(
            "folderPath cannot be changed".to_string(),
        ));
    }

    let gallery = state
        .galleries
        .update_gallery(
            id,
            GalleryUpdate {
                name: payload.name,
                description: payload.description,
                is_public: payload.is_public,
                allow_download: payload.allow_download,
            },
        )
        .await?;

    Ok(Json(gallery))
}

pub async fn delete<S, M>(
    State(state): State<AppState<S, M>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, GalleryError>
where
    S: GalleryStore,
    M: Mailer,
{
    let id = parse_id(&id, "gallery")?;
    state.galleries.delete_gallery(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
