use mongodb::bson::{self, doc};
use mongodb::{Client, Database};
use serde_json::Value;
use tracing::{debug, info};

use super::{keyed_document, Document, RecordStore, UpsertOutcome};
use crate::error::Result;

/// MongoDB field the record id is stored under.
const MONGO_ID: &str = "_id";

/// Store backed by a MongoDB database, one collection per record kind.
///
/// Each record is written with a single `update_one` using `$set` and
/// `upsert: true`, so fields missing from the record keep their stored
/// value.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to the deployment at `uri` and use the database `db_name`.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        info!(db = db_name, "connected to remote store");
        Ok(Self {
            db: client.database(db_name),
        })
    }

    fn collection(&self, name: &str) -> mongodb::Collection<bson::Document> {
        self.db.collection(name)
    }
}

impl RecordStore for MongoStore {
    async fn upsert_value(&mut self, collection: &str, record: Value) -> Result<UpsertOutcome> {
        let Some((key, document)) = keyed_document(collection, record) else {
            return Ok(UpsertOutcome::Skipped);
        };
        let fields = bson::to_document(&document)?;

        let result = self
            .collection(collection)
            .update_one(doc! { "_id": key.as_str() }, doc! { "$set": fields })
            .upsert(true)
            .await?;

        let outcome = if result.upserted_id.is_some() {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        };
        debug!(collection, id = %key, ?outcome, "document upserted");
        Ok(outcome)
    }

    async fn find(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let Some(mut stored) = self.collection(collection).find_one(doc! { "_id": id }).await? else {
            return Ok(None);
        };
        stored.remove(MONGO_ID);
        Ok(Some(bson::from_document(stored)?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // Needs a MongoDB server on localhost: `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_upsert_against_local_server() {
        let mut store = MongoStore::connect("mongodb://127.0.0.1:27017", "howstat_test")
            .await
            .unwrap();
        store.db.drop().await.unwrap();

        let first = store
            .upsert("player_bio", &json!({"id": "3600", "name": "virat kohli", "tests": 5}))
            .await
            .unwrap();
        let second = store
            .upsert("player_bio", &json!({"id": "3600", "tests": 6}))
            .await
            .unwrap();
        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Updated);

        let stored = store.find("player_bio", "3600").await.unwrap().unwrap();
        assert_eq!(stored["name"], "virat kohli");
        assert_eq!(stored["tests"], 6);
        assert!(!stored.contains_key(MONGO_ID));
        assert!(store.find("player_bio", "1").await.unwrap().is_none());

        let skipped = store.upsert("player_bio", &json!(["3600"])).await.unwrap();
        assert_eq!(skipped, UpsertOutcome::Skipped);
    }
}
