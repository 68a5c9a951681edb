//! Sharing a gallery by email.

mod mailer;
mod template;

pub use mailer::{
    BREVO_API_URL, HttpMailer, MAILPIT_API_URL, MailError, Mailer, MockMailer, OutgoingMail,
};
pub use template::{escape_html, render_share_email};

use crate::gallery::{GalleryError, GalleryService};
use crate::store::GalleryStore;

/// Who to invite and what to tell them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareInvite {
    pub gallery_id: i64,
    pub recipient: String,
    pub subject: String,
    pub message: Option<String>,
    pub include_download: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error(transparent)]
    Gallery(#[from] GalleryError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Emails `invite.recipient` a link to the gallery at `<base_url>/gallery/<id>`.
///
/// The invite is expected to be validated already; see
/// [`ShareRequest`](crate::api::types::ShareRequest).
pub async fn share_gallery<S: GalleryStore, M: Mailer>(
    galleries: &GalleryService<S>,
    mailer: &M,
    base_url: &str,
    invite: ShareInvite,
) -> Result<(), ShareError> {
    let gallery = galleries.get_gallery(invite.gallery_id).await?;
    let gallery_url = format!("{}/gallery/{}", base_url.trim_end_matches('/'), gallery.id);
    let html = render_share_email(
        &gallery,
        &gallery_url,
        invite.message.as_deref(),
        invite.include_download,
    );

    mailer
        .send(OutgoingMail {
            to: invite.recipient,
            subject: invite.subject,
            html,
        })
        .await
        .inspect_err(|e| {
            tracing::error!(gallery_id = gallery.id, error = %e, "Failed to send share email");
        })?;

    tracing::info!(gallery_id = gallery.id, "Gallery shared by email");
    Ok(())
}
