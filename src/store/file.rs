use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use super::{keyed_document, merge_into, Document, RecordStore, UpsertOutcome};
use crate::error::{HowstatError, Result};

/// Store that keeps each collection as a pretty-printed JSON object
/// (`id -> document`) in `<root>/<collection>.json`.
///
/// A collection file is replaced atomically after every accepted upsert: the
/// new contents go to a temporary file in `root` which is then renamed over
/// the old one. When that write fails the upsert is rolled back in memory as
/// well, so the cache never holds a record the caller was told was lost.
///
/// A collection file that no longer parses is moved aside to
/// `<collection>.json.corrupt-<timestamp>` and the collection starts empty.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    collections: BTreeMap<String, BTreeMap<String, Document>>,
}

impl FileStore {
    /// Open (and create if needed) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        info!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            collections: BTreeMap::new(),
        })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    fn load(&mut self, collection: &str) -> Result<&mut BTreeMap<String, Document>> {
        if !self.collections.contains_key(collection) {
            let documents = self.read_collection(collection)?;
            debug!(collection, count = documents.len(), "loaded collection");
            self.collections.insert(collection.to_owned(), documents);
        }
        Ok(self.collections.entry(collection.to_owned()).or_default())
    }

    fn read_collection(&self, collection: &str) -> Result<BTreeMap<String, Document>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        match serde_json::from_str(&raw) {
            Ok(documents) => Ok(documents),
            Err(err) => {
                let aside = self.root.join(format!(
                    "{collection}.json.corrupt-{}",
                    Local::now().format("%Y%m%d%H%M%S")
                ));
                fs::rename(&path, &aside).map_err(|e| io_error(&path, e))?;
                error!(
                    collection,
                    error = %err,
                    moved_to = %aside.display(),
                    "unreadable collection file moved aside, starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn flush(&self, collection: &str) -> Result<()> {
        let path = self.collection_path(collection);
        let Some(documents) = self.collections.get(collection) else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(documents)?;

        let mut file = NamedTempFile::new_in(&self.root).map_err(|e| io_error(&self.root, e))?;
        file.write_all(raw.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| io_error(file.path(), e))?;
        file.persist(&path).map_err(|e| io_error(&path, e.error))?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    async fn upsert_value(&mut self, collection: &str, record: Value) -> Result<UpsertOutcome> {
        let Some((key, document)) = keyed_document(collection, record) else {
            return Ok(UpsertOutcome::Skipped);
        };
        let documents = self.load(collection)?;
        let previous = documents.get(&key).cloned();
        let outcome = merge_into(documents, key.clone(), document);

        if let Err(err) = self.flush(collection) {
            let documents = self.collections.entry(collection.to_owned()).or_default();
            match previous {
                Some(previous) => documents.insert(key, previous),
                None => documents.remove(&key),
            };
            return Err(err);
        }
        debug!(collection, ?outcome, "document upserted");
        Ok(outcome)
    }

    async fn find(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        if let Some(documents) = self.collections.get(collection) {
            return Ok(documents.get(id).cloned());
        }
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let mut documents: BTreeMap<String, Document> = serde_json::from_str(&raw)?;
        Ok(documents.remove(id))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> HowstatError {
    HowstatError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_upsert_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("howstat");

        let mut store = FileStore::open(&root).unwrap();
        store
            .upsert("odi", &json!({"id": "3600", "series": "odi", "batting_innings": "240"}))
            .await
            .unwrap();
        store
            .upsert("odi", &json!({"id": "3600", "batting_innings": "248"}))
            .await
            .unwrap();
        assert!(root.join("odi.json").exists());

        let reopened = FileStore::open(&root).unwrap();
        let stored = reopened.find("odi", "3600").await.unwrap().unwrap();
        assert_eq!(stored["series"], "odi");
        assert_eq!(stored["batting_innings"], "248");
        assert!(reopened.find("odi", "1").await.unwrap().is_none());
        assert!(reopened.find("t20", "3600").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_merges_with_existing_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut store = FileStore::open(temp_dir.path()).unwrap();
        store
            .upsert("player_bio", &json!({"id": "1", "name": "a"}))
            .await
            .unwrap();
        drop(store);

        let mut store = FileStore::open(temp_dir.path()).unwrap();
        let outcome = store
            .upsert("player_bio", &json!({"id": "1", "tests": 5}))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let stored = store.find("player_bio", "1").await.unwrap().unwrap();
        assert_eq!(stored["name"], "a");
        assert_eq!(stored["tests"], 5);
    }

    #[tokio::test]
    async fn test_writes_leave_no_temporary_files() {
        let temp_dir = TempDir::new().unwrap();

        let mut store = FileStore::open(temp_dir.path()).unwrap();
        for id in ["1", "2", "3"] {
            store
                .upsert("player_bio", &json!({"id": id, "name": "a"}))
                .await
                .unwrap();
        }

        assert_eq!(file_names(temp_dir.path()), ["player_bio.json"]);
        let raw = fs::read_to_string(temp_dir.path().join("player_bio.json")).unwrap();
        let documents: BTreeMap<String, Document> = serde_json::from_str(&raw).unwrap();
        assert_eq!(documents.len(), 3);
    }

    #[tokio::test]
    async fn test_torn_collection_file_does_not_block_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("player_bio.json");

        let mut store = FileStore::open(temp_dir.path()).unwrap();
        store
            .upsert("player_bio", &json!({"id": "1", "name": "a"}))
            .await
            .unwrap();
        store
            .upsert("player_bio", &json!({"id": "2", "name": "b"}))
            .await
            .unwrap();
        drop(store);

        let raw = fs::read(&path).unwrap();
        fs::write(&path, &raw[..raw.len() / 2]).unwrap();

        let mut store = FileStore::open(temp_dir.path()).unwrap();
        for id in ["1", "2", "3"] {
            let outcome = store
                .upsert("player_bio", &json!({"id": id, "name": "c"}))
                .await
                .unwrap();
            assert_ne!(outcome, UpsertOutcome::Skipped);
        }

        let reopened = FileStore::open(temp_dir.path()).unwrap();
        for id in ["1", "2", "3"] {
            let stored = reopened.find("player_bio", id).await.unwrap().unwrap();
            assert_eq!(stored["name"], "c");
        }
        let names = file_names(temp_dir.path());
        assert_eq!(names.len(), 2);
        assert!(names[1].starts_with("player_bio.json.corrupt-"));
    }

    #[tokio::test]
    async fn test_failed_write_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("howstat");

        let mut store = FileStore::open(&root).unwrap();
        store
            .upsert("player_bio", &json!({"id": "1", "name": "a"}))
            .await
            .unwrap();
        fs::remove_dir_all(&root).unwrap();

        let err = store
            .upsert("player_bio", &json!({"id": "1", "name": "b"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HowstatError::Io { .. }));
        store
            .upsert("player_bio", &json!({"id": "2", "name": "b"}))
            .await
            .unwrap_err();

        let stored = store.find("player_bio", "1").await.unwrap().unwrap();
        assert_eq!(stored["name"], "a");
        assert!(store.find("player_bio", "2").await.unwrap().is_none());
    }
}
