use super::AppState;
use super::types::{ShareRequest, SuccessResponse, ValidatedJson};
use crate::share::{self, Mailer, ShareError, ShareInvite};
use crate::store::GalleryStore;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};

/// Base URL for links in outgoing mail: the configured one, or the scheme and
/// host the request came in on.
fn base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = configured {
        return base.to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}

pub async fn send<S, M>(
    State(state): State<AppState<S, M>>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<ShareRequest>,
) -> Result<Json<SuccessResponse>, ShareError>
where
    S: GalleryStore,
    M: Mailer,
{
    let base_url = base_url(state.public_base_url.as_deref(), &headers);

    share::share_gallery(
        &state.galleries,
        &state.mailer,
        &base_url,
        ShareInvite {
            gallery_id: payload.gallery_id,
            recipient: payload.recipient,
            subject: payload.subject,
            message: payload.message,
            include_download: payload.include_download,
        },
    )
    .await?;

    Ok(Json(SuccessResponse::ok()))
}
