//! Shared test utilities for the bridal-folio test suite.
//!
//! Provides entity builders, an in-memory content store, id extractors, and
//! lookups that panic with the available items listed on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let items = vec![
//!     image("a").in_categories(&["bridal"]).featured(),
//!     image("b").with_order(1.0),
//! ];
//! assert_eq!(item_ids(&items), vec!["a", "b"]);
//!
//! let store = MemoryStore::new().with("mediaItem", vec![json!({ "_id": "m1" })]);
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tempfile::TempDir;

use crate::source::{ContentStore, DocumentWriter, Query, SourceError};
use crate::types::{Category, CategoryCard, MediaItem, MediaType, Platform};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate (location shares append to
/// `writes.ndjson`) without affecting other tests or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Entity builders
// =========================================================================

/// A plain, unfeatured, uncategorised image with a resolvable source.
pub fn image(id: &str) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        kind: MediaType::Image,
        src: format!("https://cdn.example/{id}.jpg"),
        thumbnail: None,
        platform: Platform::Instagram,
        categories: Vec::new(),
        title: None,
        caption: None,
        is_featured: false,
        order: None,
        created_at: None,
    }
}

pub fn video(id: &str, platform: Platform) -> MediaItem {
    MediaItem {
        kind: MediaType::Video,
        src: format!("https://video.example/{id}"),
        platform,
        ..image(id)
    }
}

pub fn category(id: &str, label: &str) -> Category {
    Category {
        id: id.to_string(),
        label: label.to_string(),
        description: None,
        order: 0.0,
    }
}

/// Parse an RFC 3339 timestamp.
pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().unwrap()
}

/// Chainable tweaks on top of [`image`] / [`video`].
pub trait MediaItemExt {
    fn featured(self) -> Self;
    fn with_order(self, order: f64) -> Self;
    fn created(self, at: DateTime<Utc>) -> Self;
    fn in_categories(self, ids: &[&str]) -> Self;
}

impl MediaItemExt for MediaItem {
    fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }

    fn with_order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    fn in_categories(mut self, ids: &[&str]) -> Self {
        self.categories = ids.iter().map(|s| s.to_string()).collect();
        self
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn item_ids(items: &[MediaItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

pub fn ref_ids<'a>(items: &[&'a MediaItem]) -> Vec<&'a str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find a category card by category id. Panics if not found.
pub fn find_card<'a>(cards: &'a [CategoryCard], category_id: &str) -> &'a CategoryCard {
    cards
        .iter()
        .find(|c| c.category_id == category_id)
        .unwrap_or_else(|| {
            let available: Vec<&str> = cards.iter().map(|c| c.category_id.as_str()).collect();
            panic!("card '{category_id}' not found. Available: {available:?}")
        })
}

// =========================================================================
// In-memory content store
// =========================================================================

/// A [`ContentStore`] + [`DocumentWriter`] backed by in-memory records.
#[derive(Default)]
pub struct MemoryStore {
    records: HashMap<String, Vec<Value>>,
    failing: bool,
    failures_left: Mutex<HashMap<String, usize>>,
    read_only: bool,
    pub writes: Mutex<Vec<Value>>,
    queried: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw records under a `_type`.
    pub fn with(mut self, doc_type: &str, values: Vec<Value>) -> Self {
        self.records
            .entry(doc_type.to_string())
            .or_default()
            .extend(values);
        self
    }

    /// Every fetch times out.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// The next `times` fetches of `doc_type` time out, later ones succeed.
    pub fn failing_first(mut self, doc_type: &str, times: usize) -> Self {
        self.failures_left
            .get_mut()
            .unwrap()
            .insert(doc_type.to_string(), times);
        self
    }

    /// Every write fails.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn written(&self) -> Vec<Value> {
        self.writes.lock().unwrap().clone()
    }

    /// Distinct `_type`s fetched so far, sorted.
    pub fn queried_types(&self) -> Vec<String> {
        let mut types = self.queried.lock().unwrap().clone();
        types.sort();
        types.dedup();
        types
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, SourceError> {
        let doc_type = query.doc_type();
        self.queried.lock().unwrap().push(doc_type.to_string());
        if self.failing {
            return Err(SourceError::Timeout);
        }
        if let Some(left) = self.failures_left.lock().unwrap().get_mut(doc_type) {
            if *left > 0 {
                *left -= 1;
                return Err(SourceError::Timeout);
            }
        }
        let mut values = self
            .records
            .get(doc_type)
            .cloned()
            .unwrap_or_default();
        if query.is_singleton() {
            values.truncate(1);
        }
        Ok(values)
    }
}

#[async_trait]
impl DocumentWriter for MemoryStore {
    async fn create(&self, document: Value) -> Result<String, SourceError> {
        if self.read_only {
            return Err(SourceError::Status {
                status: 403,
                body: "read only".into(),
            });
        }
        let mut writes = self.writes.lock().unwrap();
        writes.push(document);
        Ok(format!("doc-{}", writes.len()))
    }
}
