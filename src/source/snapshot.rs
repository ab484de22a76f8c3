//! Content snapshot store.
//!
//! Reads records exported from the hosted store into a local directory.
//! Files are visited in path order so results are deterministic:
//!
//! ```text
//! content/
//! ├── categories.json      # array of records
//! ├── hero.json            # single record
//! ├── media/
//! │   └── 2024.ndjson      # one record per line
//! └── writes.ndjson        # documents created through the site
//! ```
//!
//! Every record carries its `_type`; a query returns all records of its type
//! in file order. Filtering and ordering are left to the adapter.
//!
//! `writes.ndjson` is append-only output and is never read back.

use super::{ContentStore, DocumentWriter, Query, SourceError};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use walkdir::WalkDir;

/// File that receives documents created through [`DocumentWriter`].
pub const WRITES_FILENAME: &str = "writes.ndjson";

pub struct SnapshotStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }
}

/// Read every record in the snapshot directory, in path order.
fn load_records(dir: &Path) -> Result<Vec<Value>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::Configuration(format!(
            "snapshot directory {} does not exist",
            dir.display()
        )));
    }
    let writes = dir.join(WRITES_FILENAME);
    let mut records = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SourceError::Io(e.into()))?;
        if !entry.file_type().is_file() || entry.path() == writes.as_path() {
            continue;
        }
        let path = entry.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let content = std::fs::read_to_string(path)?;
                match serde_json::from_str::<Value>(&content)? {
                    Value::Array(values) => records.extend(values),
                    value => records.push(value),
                }
            }
            Some("ndjson") => {
                let content = std::fs::read_to_string(path)?;
                for line in content.lines().filter(|l| !l.trim().is_empty()) {
                    records.push(serde_json::from_str(line)?);
                }
            }
            _ => {}
        }
    }
    Ok(records)
}

#[async_trait]
impl ContentStore for SnapshotStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, SourceError> {
        let dir = self.dir.clone();
        let records = tokio::task::spawn_blocking(move || load_records(&dir))
            .await
            .map_err(|e| SourceError::Io(std::io::Error::other(e)))??;

        let doc_type = query.doc_type();
        let matching = records
            .into_iter()
            .filter(|record| record.get("_type").and_then(Value::as_str) == Some(doc_type));
        Ok(if query.is_singleton() {
            matching.take(1).collect()
        } else {
            matching.collect()
        })
    }
}

#[async_trait]
impl DocumentWriter for SnapshotStore {
    async fn create(&self, mut document: Value) -> Result<String, SourceError> {
        let id = uuid::Uuid::new_v4().to_string();
        let Some(fields) = document.as_object_mut() else {
            return Err(SourceError::Configuration(
                "documents must be JSON objects".into(),
            ));
        };
        fields.insert("_id".into(), Value::String(id.clone()));

        let mut line = serde_json::to_string(&document)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(WRITES_FILENAME))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(id)
    }
}
