mod common;

use axum::http::StatusCode;
use common::{TEST_BASE_URL, TestApp};
use gallery_services::api::types::{ErrorResponse, SuccessResponse};
use gallery_services::share::MockMailer;
use serde_json::json;

#[tokio::test]
async fn test_share_sends_email() {
    let app = TestApp::new();
    let gallery = app.create_gallery("Wedding", "/wedding").await;

    let response = app
        .server
        .post("/api/share")
        .json(&json!({
            "galleryId": gallery.id,
            "recipient": "guest@example.com",
            "subject": "Our wedding photos",
            "message": "Thanks for coming!",
            "includeDownload": true
        }))
        .await;

    response.assert_status_ok();
    let body: SuccessResponse = response.json();
    assert!(body.success);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "guest@example.com");
    assert_eq!(sent[0].subject, "Our wedding photos");
    assert!(sent[0].html.contains(&format!("{TEST_BASE_URL}/gallery/{}", gallery.id)));
    assert!(sent[0].html.contains("Thanks for coming!"));
    assert!(sent[0].html.contains("Download access has been enabled"));
}

#[tokio::test]
async fn test_share_trims_recipient_and_subject() {
    let app = TestApp::new();
    let gallery = app.create_gallery("Wedding", "/wedding").await;

    app.server
        .post("/api/share")
        .json(&json!({
            "galleryId": gallery.id,
            "recipient": "  guest@example.com ",
            "subject": "  Photos  "
        }))
        .await
        .assert_status_ok();

    let sent = app.mailer.sent();
    assert_eq!(sent[0].to, "guest@example.com");
    assert_eq!(sent[0].subject, "Photos");
    assert!(!sent[0].html.contains("Download access has been enabled"));
}

#[tokio::test]
async fn test_share_missing_gallery() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/share")
        .json(&json!({
            "galleryId": 999999,
            "recipient": "guest@example.com",
            "subject": "Hello"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_share_validation() {
    let app = TestApp::new();
    let gallery = app.create_gallery("Wedding", "/wedding").await;

    let cases = [
        json!({ "galleryId": gallery.id, "recipient": "not-an-email", "subject": "Hi" }),
        json!({ "galleryId": gallery.id, "recipient": "guest@example.com", "subject": "   " }),
        json!({ "galleryId": gallery.id, "subject": "Hi" }),
        json!({ "galleryId": "one", "recipient": "guest@example.com", "subject": "Hi" }),
    ];
    for body in cases {
        let response = app.server.post("/api/share").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "bad_request");
    }

    let response = app
        .server
        .post("/api/share")
        .json(&json!({ "galleryId": gallery.id, "recipient": "nope", "subject": "Hi" }))
        .await;
    let error: ErrorResponse = response.json();
    assert_eq!(error.message, "recipient: Invalid recipient email");

    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_share_mail_failure_is_internal_error() {
    let app = TestApp::with_mailer(MockMailer::failing());
    let gallery = app.create_gallery("Wedding", "/wedding").await;

    let response = app
        .server
        .post("/api/share")
        .json(&json!({
            "galleryId": gallery.id,
            "recipient": "guest@example.com",
            "subject": "Hello"
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "internal_error");
}
