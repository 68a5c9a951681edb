//! Request and response bodies for the `/api` routes.

use crate::gallery::GalleryError;
use crate::share::ShareError;
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("conflict", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        match self {
            GalleryError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
            }
            GalleryError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(message))).into_response()
            }
            // Folder and path conflicts are reported as a bad request.
            GalleryError::Conflict(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::conflict(message))).into_response()
            }
            GalleryError::Storage(message) => {
                tracing::error!("Storage failure: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal_error("Storage operation failed")),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        match self {
            ShareError::Gallery(e) => e.into_response(),
            ShareError::Mail(e) => {
                tracing::error!("Mail delivery failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal_error("Failed to send email")),
                )
                    .into_response()
            }
        }
    }
}

/// Parses a numeric path id, answering 400 for anything else.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, GalleryError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| GalleryError::Validation(format!("Invalid {what} id: {raw}")))
}

/// Body of `POST /api/galleries`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryRequest {
    pub name: String,
    pub folder_path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub allow_download: Option<bool>,
}

/// Body of `PATCH /api/galleries/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub allow_download: Option<bool>,
    // Accepted only to reject it with a clear message.
    #[serde(default)]
    pub folder_path: Option<String>,
}

/// JSON body that has also passed its [`Validate`] rules.
///
/// Malformed JSON and failed rules both reject with
/// [`GalleryError::Validation`].
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = GalleryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| GalleryError::Validation(e.body_text()))?;

        payload
            .validate()
            .map_err(|e| GalleryError::Validation(validation_message(&e)))?;

        Ok(Self(payload))
    }
}

/// Joins field errors into one line, e.g. `recipient: Invalid recipient email`.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut details: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let reason = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{field}: {reason}")
            })
        })
        .collect();
    details.sort();
    details.join(", ")
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_owned())
}

/// Body of `POST /api/share`.
///
/// `recipient` and `subject` are trimmed before validation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub gallery_id: i64,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid recipient email"))]
    pub recipient: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub include_download: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "gallery"), Ok(42));
        assert!(matches!(parse_id("abc", "gallery"), Err(GalleryError::Validation(_))));
        assert!(matches!(parse_id("", "photo"), Err(GalleryError::Validation(_))));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (GalleryError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (GalleryError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (GalleryError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (GalleryError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_share_request_defaults() {
        let request: ShareRequest = serde_json::from_str(
            r#"{"galleryId": 3, "recipient": "a@b.co", "subject": "Hi"}"#,
        )
        .unwrap();
        assert_eq!(request.gallery_id, 3);
        assert!(!request.include_download);
        assert!(request.message.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_share_request_rules() {
        let parse = |body: &str| serde_json::from_str::<ShareRequest>(body).unwrap();

        let padded = parse(r#"{"galleryId": 1, "recipient": "  a@b.co ", "subject": " Hi "}"#);
        assert_eq!(padded.recipient, "a@b.co");
        assert_eq!(padded.subject, "Hi");
        assert!(padded.validate().is_ok());

        for bad in ["", "friend", "@example.com", "a b@c.com", "a@@b.com"] {
            let body = format!(r#"{{"galleryId": 1, "recipient": "{bad}", "subject": "Hi"}}"#);
            let errors = parse(&body).validate().unwrap_err();
            assert_eq!(
                validation_message(&errors),
                "recipient: Invalid recipient email",
                "{bad:?} should be rejected"
            );
        }

        let blank = parse(r#"{"galleryId": 1, "recipient": "a@b.co", "subject": "   "}"#);
        let errors = blank.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "subject: Subject is required");
    }
}
