use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::{keyed_document, merge_into, Document, RecordStore, UpsertOutcome};
use crate::error::Result;

/// Store that keeps every collection in memory. Used for dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, BTreeMap<String, Document>>,
    writes: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Collections written to, one entry per accepted upsert, in call order.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl RecordStore for MemoryStore {
    async fn upsert_value(&mut self, collection: &str, record: Value) -> Result<UpsertOutcome> {
        let Some((key, document)) = keyed_document(collection, record) else {
            return Ok(UpsertOutcome::Skipped);
        };
        let documents = self.collections.entry(collection.to_owned()).or_default();
        let outcome = merge_into(documents, key, document);
        self.writes.push(collection.to_owned());
        debug!(collection, ?outcome, "document upserted");
        Ok(outcome)
    }

    async fn find(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_upsert_merges_fields() {
        let mut store = MemoryStore::new();
        let first = store
            .upsert("player_bio", &json!({"id": "1", "name": "a", "tests": 3}))
            .await
            .unwrap();
        let second = store
            .upsert("player_bio", &json!({"id": "1", "tests": 4, "odi": 2}))
            .await
            .unwrap();

        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(store.len("player_bio"), 1);

        let stored = store.find("player_bio", "1").await.unwrap().unwrap();
        assert_eq!(stored["name"], "a");
        assert_eq!(stored["tests"], 4);
        assert_eq!(stored["odi"], 2);
    }

    #[tokio::test]
    async fn test_non_object_is_a_no_op() {
        let mut store = MemoryStore::new();
        let outcome = store.upsert("player_bio", &vec!["1", "2"]).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::Skipped);
        assert_eq!(store.len("player_bio"), 0);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_upsert_is_idempotent() {
        let mut store = MemoryStore::new();
        let record = json!({"id": "7", "series": "tests", "batting_innings": "10"});
        store.upsert("test_match", &record).await.unwrap();
        store.upsert("test_match", &record).await.unwrap();

        assert_eq!(store.len("test_match"), 1);
        assert_eq!(store.find("test_match", "7").await.unwrap().unwrap().len(), 3);
    }
}
