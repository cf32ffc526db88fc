use crate::models::ContactSubmission;
use crate::services::providers::{ContactStore, ProviderError};
use async_trait::async_trait;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};

use crate::error::AppError;

/// MongoDB-backed contact store. One client is opened at startup and shared
/// by all requests.
#[derive(Clone)]
pub struct ContactDb {
    db: Database,
}

impl ContactDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let contacts = self.contacts();

        // Recent-first index on submission time
        let submitted_index = IndexModel::builder()
            .keys(doc! { "submitted_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("submitted_at_idx".to_string())
                    .build(),
            )
            .build();

        contacts
            .create_index(submitted_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create submitted_at index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(())
    }

    fn contacts(&self) -> Collection<ContactSubmission> {
        self.db.collection("contacts")
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactStore for ContactDb {
    async fn save(&self, submission: &ContactSubmission) -> Result<(), ProviderError> {
        self.contacts()
            .insert_one(submission, None)
            .await
            .map_err(|e| ProviderError::Store(format!("Failed to insert submission: {}", e)))?;

        tracing::info!(email = %submission.email, "Contact submission persisted");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.ping()
            .await
            .map_err(|e| ProviderError::Store(e.to_string()))
    }
}
