//! Content source adapter.
//!
//! The only module that talks to the content store. It fetches raw records
//! through a [`ContentStore`], pushes them across the parse boundary in
//! [`records`], and applies the filtering and ordering every page relies on,
//! so derived views receive normalized, canonically ordered collections no
//! matter which store backs the site.
//!
//! ## Stores
//!
//! | Store | Backing | Writes |
//! |-------|---------|--------|
//! | [`SnapshotStore`] | directory of exported `*.json` / `*.ndjson` records | appended to `writes.ndjson` |
//! | [`SanityStore`] | hosted query API over HTTP | mutate API, needs a write token |
//!
//! ## Canonical ordering
//!
//! Media and video lists are ordered by `order` ascending, with records that
//! have no `order` after every record that has one; ties fall back to
//! `_createdAt` descending, then to the store's own order. Because the adapter
//! re-sorts, a store that ignores the query's `order(...)` clause still yields
//! the same page.
//!
//! ## Failure
//!
//! Every store error propagates as [`SourceError`]. The adapter never turns a
//! failure into an empty list; deciding what degrades is the page's job.

pub mod records;
mod sanity;
mod snapshot;

pub use sanity::SanityStore;
pub use snapshot::SnapshotStore;

use crate::config::{ContentBackend, SiteConfig, VideosConfig};
use crate::types::{
    About, Category, Contact, EditorialProject, Hero, MediaItem, Platform, Testimonial,
};
use async_trait::async_trait;
use records::{
    RawAbout, RawCategory, RawContact, RawEditorialProject, RawHero, RawMediaItem,
    RawTestimonial, RawVideoItem, Record,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("content store request timed out")]
    Timeout,
    #[error("malformed {doc_type} record `{id}`: {message}")]
    Parse {
        doc_type: String,
        id: String,
        message: String,
    },
    #[error("content source misconfigured: {0}")]
    Configuration(String),
}

/// One projection query against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Hero,
    MediaItems { featured_only: bool },
    VideoItems { platform: Option<Platform> },
    Categories,
    About,
    Contact,
    Testimonials { limit: Option<usize> },
    EditorialProjects,
}

impl Query {
    /// The `_type` of the documents this query reads.
    pub fn doc_type(&self) -> &'static str {
        match self {
            Query::Hero => RawHero::DOC_TYPE,
            Query::MediaItems { .. } => RawMediaItem::DOC_TYPE,
            Query::VideoItems { .. } => RawVideoItem::DOC_TYPE,
            Query::Categories => RawCategory::DOC_TYPE,
            Query::About => RawAbout::DOC_TYPE,
            Query::Contact => RawContact::DOC_TYPE,
            Query::Testimonials { .. } => RawTestimonial::DOC_TYPE,
            Query::EditorialProjects => RawEditorialProject::DOC_TYPE,
        }
    }

    /// Singletons return at most one record.
    pub fn is_singleton(&self) -> bool {
        matches!(self, Query::Hero | Query::About | Query::Contact)
    }

    /// GROQ text sent to the hosted store. Projections flatten asset
    /// references into the `*Url` / `*Alt` fields the parse boundary reads.
    pub fn groq(&self) -> String {
        const THUMBNAIL: &str = r#""thumbnailUrl": thumbnail.asset->url"#;
        const CATEGORIES: &str = "categories[]-> { id, label }";
        match self {
            Query::Hero => concat!(
                r#"*[_type == "hero"][0] { title, subtitle, location, "#,
                r#""backgroundImageUrl": backgroundImage.asset->url, "#,
                r#""backgroundImageAlt": backgroundImage.alt, "#,
                r#""heroImageUrls": heroImages[].asset->url, "heroImageAlts": heroImages[].alt, "#,
                r#""logoUrl": logo.asset->url, "logoAlt": logo.alt, "#,
                r#"showScrollCue, carouselAutoPlay, carouselInterval }"#
            )
            .to_string(),
            Query::MediaItems { featured_only } => {
                let filter = if *featured_only { " && isFeatured == true" } else { "" };
                format!(
                    r#"*[_type == "mediaItem"{filter}] | order(order asc, _createdAt desc) {{ _id, _createdAt, title, caption, "imageUrl": image.asset->url, {THUMBNAIL}, {CATEGORIES}, isFeatured, platform, order }}"#
                )
            }
            Query::VideoItems { platform } => {
                let filter = platform
                    .as_ref()
                    .map(|p| format!(r#" && platform == "{}""#, p.as_tag()))
                    .unwrap_or_default();
                format!(
                    r#"*[_type == "videoItem"{filter}] | order(order asc, _createdAt desc) {{ _id, _createdAt, title, caption, platform, url, {THUMBNAIL}, {CATEGORIES}, isFeatured, order }}"#
                )
            }
            Query::Categories => {
                r#"*[_type == "category"] | order(order asc) { id, label, description, order }"#
                    .to_string()
            }
            Query::About => concat!(
                r#"*[_type == "about"][0] { name, "imageUrl": image.asset->url, "#,
                r#""imageAlt": image.alt, bio, expertise }"#
            )
            .to_string(),
            Query::Contact => concat!(
                r#"*[_type == "contact"][0] { whatsappNumber, whatsappMessage, phoneNumber, "#,
                r#"instagramHandle, facebookUrl, youtubeChannelUrl, email, showBookingForm, "#,
                r#"contactTitle, contactSubtitle }"#
            )
            .to_string(),
            Query::Testimonials { limit } => {
                let slice = limit.map(|n| format!(" [0...{n}]")).unwrap_or_default();
                format!(
                    r#"*[_type == "testimonial" && isFeatured == true] | order(date desc, order asc){slice} {{ _id, quote, authorName, "authorProfilePicUrl": authorProfilePic.asset->url, "authorProfilePicFromUrl": authorProfilePicUrl, platform, event, date, order, isFeatured }}"#
                )
            }
            Query::EditorialProjects => concat!(
                r#"*[_type == "editorial"] | order(order asc, date desc) { _id, title, date, "#,
                r#"description, "imageUrl": image.asset->url, "imageAlt": image.alt, "#,
                r#"galleryLink, galleryLinkText, order }"#
            )
            .to_string(),
        }
    }
}

/// A read-only source of raw, projected store records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every record the query selects. Singletons yield zero or one record.
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, SourceError>;
}

/// Accepts new documents for the store. Returns the created document id.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    async fn create(&self, document: Value) -> Result<String, SourceError>;
}

/// Open the store and writer selected by `[content]`.
///
/// The writer is `None` when the backend cannot accept writes with the
/// current secrets (the hosted store without a write token).
pub fn open(
    root: &Path,
    config: &SiteConfig,
    secrets: &crate::config::Secrets,
) -> Result<(Arc<dyn ContentStore>, Option<Arc<dyn DocumentWriter>>), SourceError> {
    match config.content.backend {
        ContentBackend::Snapshot => {
            let store = Arc::new(SnapshotStore::new(root.join(&config.content.snapshot_dir)));
            let reader: Arc<dyn ContentStore> = store.clone();
            let writer: Arc<dyn DocumentWriter> = store;
            Ok((reader, Some(writer)))
        }
        ContentBackend::Sanity => {
            let reader: Arc<dyn ContentStore> =
                Arc::new(SanityStore::new(&config.content, secrets.read_token.clone())?);
            let writer = match &secrets.write_token {
                Some(token) => {
                    let writer: Arc<dyn DocumentWriter> = Arc::new(SanityStore::writer(
                        &config.content,
                        token.clone(),
                    )?);
                    Some(writer)
                }
                None => None,
            };
            Ok((reader, writer))
        }
    }
}

/// The content source adapter.
#[derive(Clone)]
pub struct ContentSource {
    store: Arc<dyn ContentStore>,
    enabled_platforms: Vec<Platform>,
}

impl ContentSource {
    pub fn new(store: Arc<dyn ContentStore>, videos: &VideosConfig) -> Self {
        Self {
            store,
            enabled_platforms: videos.platforms(),
        }
    }

    async fn fetch(&self, query: Query) -> Result<Vec<Value>, SourceError> {
        let values = self.store.fetch(&query).await?;
        debug!(doc_type = query.doc_type(), records = values.len(), "fetched");
        Ok(values)
    }

    /// Image media items in canonical order.
    pub async fn get_media_items(&self, featured_only: bool) -> Result<Vec<MediaItem>, SourceError> {
        let values = self.fetch(Query::MediaItems { featured_only }).await?;
        let mut items = records::parse_all::<RawMediaItem>(values)?;
        if featured_only {
            items.retain(|item| item.is_featured);
        }
        items.sort_by(canonical_order);
        Ok(items)
    }

    /// Video items in canonical order, restricted to enabled platforms.
    ///
    /// `platform` narrows the result further; asking for a disabled platform
    /// yields an empty list.
    pub async fn get_video_items(
        &self,
        platform: Option<Platform>,
    ) -> Result<Vec<MediaItem>, SourceError> {
        let values = self
            .fetch(Query::VideoItems {
                platform: platform.clone(),
            })
            .await?;
        let mut items = records::parse_all::<RawVideoItem>(values)?;
        items.retain(|item| {
            platform.as_ref().is_none_or(|p| &item.platform == p)
                && self.enabled_platforms.contains(&item.platform)
        });
        items.sort_by(canonical_order);
        Ok(items)
    }

    /// Categories ordered by `order` ascending, ties in store order.
    pub async fn get_categories(&self) -> Result<Vec<Category>, SourceError> {
        let values = self.fetch(Query::Categories).await?;
        let mut categories = records::parse_all::<RawCategory>(values)?;
        categories.sort_by(|a, b| a.order.total_cmp(&b.order));
        Ok(categories)
    }

    pub async fn get_hero(&self) -> Result<Option<Hero>, SourceError> {
        let values = self.fetch(Query::Hero).await?;
        records::parse_first::<RawHero>(values)
    }

    pub async fn get_about(&self) -> Result<Option<About>, SourceError> {
        let values = self.fetch(Query::About).await?;
        records::parse_first::<RawAbout>(values)
    }

    pub async fn get_contact(&self) -> Result<Option<Contact>, SourceError> {
        let values = self.fetch(Query::Contact).await?;
        records::parse_first::<RawContact>(values)
    }

    /// Featured testimonials, newest first, then by `order`.
    pub async fn get_testimonials(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<Testimonial>, SourceError> {
        let values = self.fetch(Query::Testimonials { limit }).await?;
        let mut testimonials: Vec<Testimonial> = records::parse_all::<RawTestimonial>(values)?
            .into_iter()
            .filter(|record| record.is_featured)
            .map(|record| record.testimonial)
            .collect();
        testimonials.sort_by(|a, b| {
            newest_first(a.date.as_ref(), b.date.as_ref()).then(a.order.total_cmp(&b.order))
        });
        if let Some(limit) = limit {
            testimonials.truncate(limit);
        }
        Ok(testimonials)
    }

    /// Editorial projects by `order` ascending, then newest first.
    pub async fn get_editorial_projects(&self) -> Result<Vec<EditorialProject>, SourceError> {
        let values = self.fetch(Query::EditorialProjects).await?;
        let mut projects = records::parse_all::<RawEditorialProject>(values)?;
        projects.sort_by(|a, b| {
            a.order
                .total_cmp(&b.order)
                .then_with(|| newest_first(a.date.as_ref(), b.date.as_ref()))
        });
        Ok(projects)
    }
}

/// Order ascending with missing order last, then `_createdAt` descending.
fn canonical_order(a: &MediaItem, b: &MediaItem) -> Ordering {
    let by_order = match (a.order, b.order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_order.then_with(|| newest_first(a.created_at.as_ref(), b.created_at.as_ref()))
}

/// Descending by value; missing values sort after present ones.
fn newest_first<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MemoryStore, item_ids};
    use serde_json::json;

    fn source(store: MemoryStore) -> ContentSource {
        ContentSource::new(Arc::new(store), &VideosConfig::default())
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[tokio::test]
    async fn media_items_canonical_order() {
        let store = MemoryStore::new().with(
            "mediaItem",
            vec![
                json!({ "_id": "no-order-old", "_createdAt": "2023-01-01T00:00:00Z" }),
                json!({ "_id": "order-2", "order": 2 }),
                json!({ "_id": "no-order-new", "_createdAt": "2024-01-01T00:00:00Z" }),
                json!({ "_id": "order-1", "order": 1 }),
                json!({ "_id": "no-order-untimed" }),
            ],
        );
        let items = source(store).get_media_items(false).await.unwrap();
        assert_eq!(
            item_ids(&items),
            vec![
                "order-1",
                "order-2",
                "no-order-new",
                "no-order-old",
                "no-order-untimed"
            ]
        );
    }

    #[tokio::test]
    async fn equal_order_breaks_on_created_at() {
        let store = MemoryStore::new().with(
            "mediaItem",
            vec![
                json!({ "_id": "older", "order": 1, "_createdAt": "2023-01-01T00:00:00Z" }),
                json!({ "_id": "newer", "order": 1, "_createdAt": "2024-01-01T00:00:00Z" }),
                json!({ "_id": "untimed", "order": 1 }),
            ],
        );
        let items = source(store).get_media_items(false).await.unwrap();
        assert_eq!(item_ids(&items), vec!["newer", "older", "untimed"]);
    }

    #[tokio::test]
    async fn featured_only_filters() {
        let store = MemoryStore::new().with(
            "mediaItem",
            vec![
                json!({ "_id": "a", "isFeatured": true }),
                json!({ "_id": "b" }),
                json!({ "_id": "c", "isFeatured": true }),
            ],
        );
        let items = source(store).get_media_items(true).await.unwrap();
        assert_eq!(item_ids(&items), vec!["a", "c"]);
    }

    // =========================================================================
    // Video platform policy
    // =========================================================================

    fn video_store() -> MemoryStore {
        MemoryStore::new().with(
            "videoItem",
            vec![
                json!({ "_id": "yt", "url": "https://youtu.be/dQw4w9WgXcQ" }),
                json!({ "_id": "ig", "platform": "instagram", "url": "https://instagram.com/reel/x" }),
            ],
        )
    }

    #[tokio::test]
    async fn disabled_platforms_are_excluded() {
        let videos = source(video_store()).get_video_items(None).await.unwrap();
        assert_eq!(item_ids(&videos), vec!["yt"]);

        let reels = source(video_store())
            .get_video_items(Some(Platform::Instagram))
            .await
            .unwrap();
        assert!(reels.is_empty());
    }

    #[tokio::test]
    async fn enabling_a_platform_needs_only_config() {
        let config = VideosConfig {
            enabled_platforms: vec!["youtube".into(), "instagram".into()],
        };
        let source = ContentSource::new(Arc::new(video_store()), &config);
        let videos = source.get_video_items(None).await.unwrap();
        assert_eq!(item_ids(&videos), vec!["yt", "ig"]);
        let reels = source.get_video_items(Some(Platform::Instagram)).await.unwrap();
        assert_eq!(item_ids(&reels), vec!["ig"]);
    }

    // =========================================================================
    // Lists and singletons
    // =========================================================================

    #[tokio::test]
    async fn testimonials_featured_newest_first_with_limit() {
        let store = MemoryStore::new().with(
            "testimonial",
            vec![
                json!({ "_id": "old", "quote": "q", "authorName": "A", "isFeatured": true, "date": "2023-01-01T00:00:00Z" }),
                json!({ "_id": "hidden", "quote": "q", "authorName": "B", "isFeatured": false, "date": "2025-01-01T00:00:00Z" }),
                json!({ "_id": "unflagged", "quote": "q", "authorName": "E", "date": "2025-02-01T00:00:00Z" }),
                json!({ "_id": "new", "quote": "q", "authorName": "C", "isFeatured": true, "date": "2024-06-01T00:00:00Z" }),
                json!({ "_id": "undated", "quote": "q", "authorName": "D", "isFeatured": true }),
            ],
        );
        let source = source(store);
        let all = source.get_testimonials(None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);

        let limited = source.get_testimonials(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn categories_sorted_by_order() {
        let store = MemoryStore::new().with(
            "category",
            vec![
                json!({ "id": "party", "label": "Party", "order": 2 }),
                json!({ "id": "bridal", "label": "Bridal", "order": 1 }),
                json!({ "id": "mehendi", "label": "Mehendi" }),
            ],
        );
        let cats = source(store).get_categories().await.unwrap();
        let ids: Vec<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["mehendi", "bridal", "party"]);
    }

    #[tokio::test]
    async fn missing_singleton_is_none() {
        let source = source(MemoryStore::new());
        assert!(source.get_hero().await.unwrap().is_none());
        assert!(source.get_about().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = MemoryStore::new().failing();
        let err = source(store).get_media_items(false).await.unwrap_err();
        assert!(matches!(err, SourceError::Timeout));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[test]
    fn groq_carries_filters() {
        let featured = Query::MediaItems { featured_only: true }.groq();
        assert!(featured.contains(r#"_type == "mediaItem" && isFeatured == true"#));
        assert!(featured.contains("order(order asc, _createdAt desc)"));

        let reels = Query::VideoItems {
            platform: Some(Platform::Instagram),
        }
        .groq();
        assert!(reels.contains(r#"platform == "instagram""#));

        let six = Query::Testimonials { limit: Some(6) }.groq();
        assert!(six.contains("[0...6]"));
    }

    #[test]
    fn singletons() {
        assert!(Query::Hero.is_singleton());
        assert!(!Query::Categories.is_singleton());
        assert_eq!(Query::EditorialProjects.doc_type(), "editorial");
    }
}
