//! # MongoDB
//!
//! Document database.
//!
//! Core purpose is to persist feedback entries and return them newest first.
//!
//! ## Requirements
//!
//! - Append only: entries are inserted, never updated or deleted
//! - Single collection, `feedbacks`
//! - Whole collection listed on every read, no pagination
//!
//! ## Implementation
//!
//! - One `Client` per process, pooling is left to the driver
//! - `_id` is generated here so the inserted entry is returned without a read back
//! - `createdAt` stored as a BSON date
//! - Listing sorts on `{ createdAt: -1, _id: -1 }`, ObjectIds grow with insertion so ties stay stable
//! - A failed connection at startup is fatal, there is no retry
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, doc, oid::ObjectId},
    options::ClientOptions,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::Config,
    error::StoreError,
    models::{FEEDBACK_COLLECTION, FeedbackEntry, NewFeedback},
};

const APP_NAME: &str = "student-feedback";
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Connected,
    Disconnected,
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert(&self, new_feedback: NewFeedback) -> Result<FeedbackEntry, StoreError>;

    /// All entries, `createdAt` descending.
    async fn list(&self) -> Result<Vec<FeedbackEntry>, StoreError>;

    async fn status(&self) -> StoreStatus;
}

#[derive(Debug, Serialize, Deserialize)]
struct FeedbackDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    feedback: String,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
}

impl From<NewFeedback> for FeedbackDocument {
    fn from(new_feedback: NewFeedback) -> Self {
        Self {
            id: ObjectId::new(),
            name: new_feedback.name,
            feedback: new_feedback.feedback,
            created_at: bson::DateTime::from_millis(new_feedback.created_at.timestamp_millis()),
        }
    }
}

impl From<FeedbackDocument> for FeedbackEntry {
    fn from(document: FeedbackDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            name: document.name,
            feedback: document.feedback,
            created_at: DateTime::from_timestamp_millis(document.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

pub struct MongoStore {
    database: Database,
    collection: Collection<FeedbackDocument>,
}

impl MongoStore {
    pub async fn connect(config: &Config) -> Result<Self, mongodb::error::Error> {
        info!("Connecting to MongoDB...");

        let mut options = ClientOptions::parse(&config.mongo_uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.mongo_db));

        database.run_command(doc! { "ping": 1 }).await?;
        info!("MongoDB connected successfully to {}", database.name());

        Ok(Self::with_collection(database, FEEDBACK_COLLECTION))
    }

    fn with_collection(database: Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
            database,
        }
    }
}

#[async_trait]
impl FeedbackStore for MongoStore {
    async fn insert(&self, new_feedback: NewFeedback) -> Result<FeedbackEntry, StoreError> {
        let document = FeedbackDocument::from(new_feedback);
        self.collection.insert_one(&document).await?;

        Ok(document.into())
    }

    async fn list(&self) -> Result<Vec<FeedbackEntry>, StoreError> {
        let documents: Vec<FeedbackDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(FeedbackEntry::from).collect())
    }

    async fn status(&self) -> StoreStatus {
        match self.database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => StoreStatus::Connected,
            Err(e) => {
                warn!("MongoDB ping failed: {e}");
                StoreStatus::Disconnected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use chrono::Utc;

    use super::*;

    /// Store on a throwaway collection of the database at `MONGO_URI`.
    async fn live_store() -> MongoStore {
        let uri = env::var("MONGO_URI").expect("MONGO_URI must point at a running MongoDB");
        let client = Client::with_uri_str(&uri).await.unwrap();
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database("feedback_store_tests"));

        let collection = format!("{FEEDBACK_COLLECTION}_{}", ObjectId::new().to_hex());

        MongoStore::with_collection(database, &collection)
    }

    #[test]
    fn document_round_trips_into_entry() {
        let created_at = DateTime::from_timestamp_millis(1_700_000_000_456).unwrap();
        let new_feedback = NewFeedback::new("Bob", "Loved the labs").with_created_at(created_at);

        let document = FeedbackDocument::from(new_feedback);
        let id = document.id;
        let entry = FeedbackEntry::from(document);

        assert_eq!(entry.id, id.to_hex());
        assert_eq!(entry.name, "Bob");
        assert_eq!(entry.feedback, "Loved the labs");
        assert_eq!(entry.created_at, created_at);
    }

    #[test]
    fn documents_get_distinct_ids() {
        let a = FeedbackDocument::from(NewFeedback::new("a", "a"));
        let b = FeedbackDocument::from(NewFeedback::new("b", "b"));

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn document_serializes_with_mongo_field_names() {
        let document =
            FeedbackDocument::from(NewFeedback::new("Cara", "Fine").with_created_at(Utc::now()));
        let bson_doc = bson::to_document(&document).unwrap();

        assert!(bson_doc.get_object_id("_id").is_ok());
        assert!(bson_doc.get_datetime("createdAt").is_ok());
        assert_eq!(bson_doc.get_str("name").unwrap(), "Cara");
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB at MONGO_URI"]
    async fn live_list_sorts_newest_first_then_latest_insert() {
        let store = live_store().await;
        let at = |millis| DateTime::from_timestamp_millis(millis).unwrap();

        for (name, millis) in [("old", 1_000), ("tie a", 5_000), ("new", 9_000), ("tie b", 5_000)] {
            store
                .insert(NewFeedback::new(name, "ordering").with_created_at(at(millis)))
                .await
                .unwrap();
        }

        let listed = store.list().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|entry| entry.name.as_str()).collect();

        assert_eq!(names, ["new", "tie b", "tie a", "old"]);
        assert_eq!(listed[0].created_at, at(9_000));
        assert_eq!(store.list().await.unwrap(), listed);

        store.collection.drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB at MONGO_URI"]
    async fn live_insert_returns_what_list_reads_back() {
        let store = live_store().await;

        let saved = store
            .insert(NewFeedback::new("Alice Test", "End-to-End verified!"))
            .await
            .unwrap();
        let listed = store.list().await.unwrap();

        assert_eq!(listed, vec![saved]);
        assert_eq!(store.status().await, StoreStatus::Connected);

        store.collection.drop().await.unwrap();
    }
}
