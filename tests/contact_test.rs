mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{TestApp, ADMIN_EMAIL};
use serde_json::json;

#[tokio::test]
async fn missing_fields_are_rejected_without_touching_collaborators() {
    let app = TestApp::spawn();

    let bodies = [
        json!({}),
        json!({ "name": "Jane" }),
        json!({ "name": "Jane", "email": "jane@example.com" }),
        json!({ "email": "jane@example.com", "message": "Hi" }),
        json!({ "name": "", "email": "jane@example.com", "message": "Hi" }),
    ];

    for body in bodies {
        let (status, response) = app.post_json("/api/contact", body.clone()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["error"], "All fields are required");
    }

    assert!(app.store.saved().is_empty());
    assert!(app.mailer.sent().is_empty());
    assert!(app.journal.events().is_empty());
}

#[tokio::test]
async fn valid_submission_saves_then_notifies_then_auto_replies() {
    let app = TestApp::spawn();

    let (status, response) = app
        .post_json(
            "/api/contact",
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "message": "Hello there"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response["message"],
        "Form submitted and email sent successfully!"
    );

    let saved = app.store.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Jane");
    assert_eq!(saved[0].email, "jane@example.com");
    assert_eq!(saved[0].message, "Hello there");
    assert!(saved[0].submitted_at <= chrono::Utc::now());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);

    // Operator notification first, replying to the submitter
    assert_eq!(sent[0].to, ADMIN_EMAIL);
    assert_eq!(sent[0].subject, "New Portfolio Message from Jane");
    assert_eq!(sent[0].reply_to.as_deref(), Some("jane@example.com"));

    // Auto-reply to the submitter second
    assert_eq!(sent[1].to, "jane@example.com");
    assert_eq!(sent[1].subject, "Message Received");

    assert_eq!(
        app.journal.events(),
        vec![
            "store.save".to_string(),
            format!("mail.send:{}", ADMIN_EMAIL),
            "mail.send:jane@example.com".to_string(),
        ]
    );
}

#[tokio::test]
async fn store_failure_yields_500_and_no_mail_is_sent() {
    let app = TestApp::spawn();
    app.store.set_failing(true);

    let (status, response) = app
        .post_json(
            "/api/contact",
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "message": "Hello there"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "Failed to handle form submission");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn send_failure_after_save_yields_500_and_keeps_the_record() {
    let app = TestApp::spawn();
    app.mailer.set_failing(true);

    let (status, response) = app
        .post_json(
            "/api/contact",
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "message": "Hello there"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "Failed to handle form submission");

    // No rollback: the submission stays persisted
    let saved = app.store.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].email, "jane@example.com");
}

#[tokio::test]
async fn disallowed_method_yields_405_envelope() {
    let app = TestApp::spawn();

    let response = app
        .request(
            Request::builder()
                .method(Method::GET)
                .uri("/api/contact")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "Method Not Allowed");
}
