//! Mock collaborators for tests and for running without external systems.

use super::{
    ContactStore, EmailMessage, GeneratedText, MailTransport, ProviderError, TextGenerator,
};
use crate::models::ContactSubmission;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared record of collaborator invocations, in call order. Lets tests
/// assert cross-collaborator ordering (save before sends) from one place.
#[derive(Clone, Default)]
pub struct CallJournal {
    events: Arc<Mutex<Vec<String>>>,
}

impl CallJournal {
    pub fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub struct MockContactStore {
    journal: CallJournal,
    saved: Mutex<Vec<ContactSubmission>>,
    failing: AtomicBool,
}

impl MockContactStore {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            journal,
            saved: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<ContactSubmission> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactStore for MockContactStore {
    async fn save(&self, submission: &ContactSubmission) -> Result<(), ProviderError> {
        self.journal.record("store.save".to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Store("mock store failure".to_string()));
        }

        self.saved.lock().unwrap().push(submission.clone());
        tracing::info!(email = %submission.email, "[MOCK] Submission would be persisted");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Store("mock store failure".to_string()));
        }
        Ok(())
    }
}

pub struct MockMailTransport {
    journal: CallJournal,
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl MockMailTransport {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            journal,
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, email: &EmailMessage) -> Result<(), ProviderError> {
        self.journal.record(format!("mail.send:{}", email.to));

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::SendFailed(
                "mock transport failure".to_string(),
            ));
        }

        self.sent.lock().unwrap().push(email.clone());
        tracing::info!(to = %email.to, subject = %email.subject, "[MOCK] Email would be sent");
        Ok(())
    }
}

pub struct MockTextGenerator {
    journal: CallJournal,
    reply: Mutex<Option<String>>,
    failing: AtomicBool,
}

impl MockTextGenerator {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            journal,
            reply: Mutex::new(Some("Mock reply.".to_string())),
            failing: AtomicBool::new(false),
        }
    }

    /// `None` simulates a well-formed upstream payload that lacks the
    /// expected text field.
    pub fn set_reply(&self, reply: Option<String>) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, ProviderError> {
        self.journal.record("generator.generate".to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Api("mock generator failure".to_string()));
        }

        tracing::info!(prompt_len = prompt.len(), "[MOCK] Text would be generated");
        Ok(GeneratedText {
            text: self.reply.lock().unwrap().clone(),
        })
    }
}
