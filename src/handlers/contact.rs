use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::ContactSubmission;
use crate::services::providers::EmailMessage;
use crate::startup::AppState;

pub const CONTACT_SUCCESS_MESSAGE: &str = "Form submitted and email sent successfully!";

const MISSING_FIELDS_MESSAGE: &str = "All fields are required";

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

/// Persist the submission, notify the operator, then auto-reply to the
/// submitter. The three steps run strictly in that order and are not
/// transactional: a send failure after a successful save leaves the record
/// persisted.
#[tracing::instrument(skip(state, request))]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation(MISSING_FIELDS_MESSAGE))?;

    let submission = ContactSubmission::new(request.name, request.email, request.message);

    state
        .store
        .save(&submission)
        .await
        .map_err(AppError::ContactDelivery)?;

    let notification = EmailMessage {
        to: state.config.mail.admin_email.clone(),
        subject: format!("New Portfolio Message from {}", submission.name),
        body_text: Some(format!(
            "Name: {}\nEmail: {}\nMessage: {}",
            submission.name, submission.email, submission.message
        )),
        body_html: None,
        from_name: Some(submission.name.clone()),
        reply_to: Some(submission.email.clone()),
    };

    state
        .mailer
        .send(&notification)
        .await
        .map_err(AppError::ContactDelivery)?;

    let auto_reply = EmailMessage {
        to: submission.email.clone(),
        subject: "Message Received".to_string(),
        body_text: Some(format!(
            "Hi {},\n\nThanks for your message. I will get back to you soon.\n\nBest regards,\n{}",
            submission.name, state.config.mail.from_name
        )),
        body_html: None,
        from_name: Some(state.config.mail.from_name.clone()),
        reply_to: None,
    };

    state
        .mailer
        .send(&auto_reply)
        .await
        .map_err(AppError::ContactDelivery)?;

    tracing::info!(email = %submission.email, "Contact submission handled");

    Ok((
        StatusCode::OK,
        Json(ContactResponse {
            message: CONTACT_SUCCESS_MESSAGE.to_string(),
        }),
    ))
}
