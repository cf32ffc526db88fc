pub mod chatbot;
pub mod contact;
pub mod health;

use crate::error::AppError;

/// Fallback for the API routes when a disallowed HTTP method is used.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
