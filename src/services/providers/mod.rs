//! Collaborator abstractions behind narrow traits.
//!
//! Each request performs at most one logical unit of work per collaborator:
//! a store write, a mail send, or a single text-generation call. Production
//! implementations live alongside recording mocks so handlers can be tested
//! without external systems.

pub mod email;
pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ContactSubmission;

pub use email::SmtpMailer;
pub use gemini::GeminiGenerator;
pub use mock::{CallJournal, MockContactStore, MockMailTransport, MockTextGenerator};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub from_name: Option<String>,
    pub reply_to: Option<String>,
}

/// Outcome of a text-generation call. A missing `text` is a successful call
/// whose payload lacked the expected field; the normalization step
/// substitutes the documented fallback.
#[derive(Debug, Clone, Default)]
pub struct GeneratedText {
    pub text: Option<String>,
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn save(&self, submission: &ContactSubmission) -> Result<(), ProviderError>;
    async fn health_check(&self) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, ProviderError>;
}
