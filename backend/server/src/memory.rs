//! In-process store with the same ordering rules as MongoDB, ties go to the later insert.
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    database::{FeedbackStore, StoreStatus},
    error::StoreError,
    models::{FeedbackEntry, NewFeedback},
};

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<FeedbackEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn insert(&self, new_feedback: NewFeedback) -> Result<FeedbackEntry, StoreError> {
        let entry = FeedbackEntry {
            id: ObjectId::new().to_hex(),
            name: new_feedback.name,
            feedback: new_feedback.feedback,
            created_at: new_feedback.created_at,
        };

        self.entries.write().await.push(entry.clone());

        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<FeedbackEntry>, StoreError> {
        let mut entries: Vec<FeedbackEntry> =
            self.entries.read().await.iter().rev().cloned().collect();

        // stable, so equal timestamps keep newest-insert-first from the reverse
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries)
    }

    async fn status(&self) -> StoreStatus {
        StoreStatus::Connected
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryStore::new();

        store
            .insert(NewFeedback::new("old", "x").with_created_at(at(1_000)))
            .await
            .unwrap();
        store
            .insert(NewFeedback::new("new", "x").with_created_at(at(3_000)))
            .await
            .unwrap();
        store
            .insert(NewFeedback::new("mid", "x").with_created_at(at(2_000)))
            .await
            .unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn equal_timestamps_put_later_insert_first() {
        let store = MemoryStore::new();

        for name in ["first", "second", "third"] {
            store
                .insert(NewFeedback::new(name, "same instant").with_created_at(at(5_000)))
                .await
                .unwrap();
        }

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn listing_twice_is_identical() {
        let store = MemoryStore::new();

        for i in 0..5 {
            store
                .insert(NewFeedback::new(format!("student {i}"), "ok"))
                .await
                .unwrap();
        }

        let first = store.list().await.unwrap();
        let second = store.list().await.unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn inserted_entries_get_unique_ids() {
        let store = MemoryStore::new();

        let a = store.insert(NewFeedback::new("a", "a")).await.unwrap();
        let b = store.insert(NewFeedback::new("b", "b")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.status().await, StoreStatus::Connected);
    }
}
