//! Keyed document store the pipeline writes its records to.
//!
//! Every record is serialized to a JSON object and matched on its `id`
//! field. An upsert creates the document when it is absent and otherwise
//! overwrites only the fields present in the new record.

mod file;
mod memory;
mod mongo;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;

/// A stored record.
pub type Document = Map<String, Value>;

/// Field every record is matched on.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// The record was not a JSON object or had no usable id.
    Skipped,
}

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Insert or merge an already serialized record.
    async fn upsert_value(&mut self, collection: &str, record: Value) -> Result<UpsertOutcome>;

    /// Look up a document by its id.
    async fn find(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    async fn upsert<T: Serialize>(&mut self, collection: &str, record: &T) -> Result<UpsertOutcome>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(record)?;
        self.upsert_value(collection, value).await
    }
}

/// Split a serialized record into its key and fields, or `None` when it
/// cannot be stored.
pub(crate) fn keyed_document(collection: &str, record: Value) -> Option<(String, Document)> {
    let Value::Object(document) = record else {
        warn!(collection, "only objects can be written to the store");
        return None;
    };
    let key = match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            warn!(collection, "record has no id, not written");
            return None;
        }
    };
    Some((key, document))
}

/// Merge `incoming` into the document stored under `key`.
pub(crate) fn merge_into(
    documents: &mut std::collections::BTreeMap<String, Document>,
    key: String,
    incoming: Document,
) -> UpsertOutcome {
    match documents.get_mut(&key) {
        Some(existing) => {
            existing.extend(incoming);
            UpsertOutcome::Updated
        }
        None => {
            documents.insert(key, incoming);
            UpsertOutcome::Inserted
        }
    }
}
