use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A persisted contact-form submission. Insert-only: there is no update or
/// delete path once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Construct a submission from already-validated fields, stamping the
    /// submission time.
    pub fn new(name: String, email: String, message: String) -> Self {
        Self {
            id: None,
            name,
            email,
            message,
            submitted_at: Utc::now(),
        }
    }
}
