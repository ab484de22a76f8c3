//! The parse boundary between raw store records and typed entities.
//!
//! Store records arrive as loosely-typed JSON: fields may be missing, null,
//! or (for dereferenced references) dangling. Each document type has a `Raw*`
//! serde struct where everything except identity is optional, and a
//! [`Record::normalize`] step that applies every default exactly once:
//!
//! | Field | Rule |
//! |-------|------|
//! | image `src` | `imageUrl`, else empty string |
//! | image `thumbnail` | `thumbnailUrl` → `imageUrl` → none |
//! | video `thumbnail` | `thumbnailUrl` → derived YouTube still → none |
//! | `caption` | `caption` → `title` (first non-empty wins) |
//! | `platform` | images → instagram, videos → youtube |
//! | `isFeatured` | false |
//! | `categories` | `[]`, dangling references dropped |
//!
//! A record missing its identity (`_id`, or a category's `id`/`label`) fails
//! the whole fetch with [`SourceError::Parse`] rather than being dropped.

use super::SourceError;
use crate::thumbnails;
use crate::types::{
    About, Category, Contact, EditorialProject, Hero, ImageRef, MediaItem, MediaType, Platform,
    Testimonial,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A raw store document that normalizes into a typed entity.
pub trait Record: DeserializeOwned {
    type Output;

    /// The `_type` this record is stored under.
    const DOC_TYPE: &'static str;

    fn normalize(self) -> Result<Self::Output, String>;
}

/// Parse and normalize every raw record. The first failure aborts the batch.
pub fn parse_all<R: Record>(values: Vec<Value>) -> Result<Vec<R::Output>, SourceError> {
    values.into_iter().map(parse_value::<R>).collect()
}

/// Parse the first record of a singleton query, if any.
pub fn parse_first<R: Record>(values: Vec<Value>) -> Result<Option<R::Output>, SourceError> {
    values.into_iter().next().map(parse_value::<R>).transpose()
}

fn parse_value<R: Record>(value: Value) -> Result<R::Output, SourceError> {
    let id = value
        .get("_id")
        .or_else(|| value.get("id"))
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    let parse_error = |message: String| SourceError::Parse {
        doc_type: R::DOC_TYPE.to_string(),
        id: id.clone(),
        message,
    };
    let raw: R = serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))?;
    raw.normalize().map_err(parse_error)
}

/// Resolve a field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value (after trimming).
///
/// ```text
/// caption:   resolve(&[caption, title])
/// thumbnail: resolve(&[thumbnailUrl, imageUrl])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .next()
}

fn non_empty(value: Option<String>) -> Option<String> {
    resolve(&[value.as_deref()])
}

fn require(value: Option<String>, field: &str) -> Result<String, String> {
    non_empty(value).ok_or_else(|| format!("missing required field `{field}`"))
}

fn image_ref(url: Option<String>, alt: Option<String>) -> Option<ImageRef> {
    non_empty(url).map(|url| ImageRef {
        url,
        alt: non_empty(alt),
    })
}

/// A category reference: either the dereferenced `{id, label}` projection
/// or a bare id, as snapshot exports may carry either.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryRef {
    Id(String),
    Expanded { id: Option<String> },
}

fn category_ids(refs: Option<Vec<Option<RawCategoryRef>>>) -> Vec<String> {
    refs.unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|r| match r {
            RawCategoryRef::Id(id) => non_empty(Some(id)),
            RawCategoryRef::Expanded { id } => non_empty(id),
        })
        .collect()
}

fn platform_or(tag: Option<String>, default: Platform) -> Platform {
    non_empty(tag)
        .map(|t| Platform::from_tag(&t))
        .unwrap_or(default)
}

// ============================================================================
// Media
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMediaItem {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_createdAt")]
    created_at: Option<DateTime<Utc>>,
    title: Option<String>,
    caption: Option<String>,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
    categories: Option<Vec<Option<RawCategoryRef>>>,
    is_featured: Option<bool>,
    platform: Option<String>,
    order: Option<f64>,
}

impl Record for RawMediaItem {
    type Output = MediaItem;
    const DOC_TYPE: &'static str = "mediaItem";

    fn normalize(self) -> Result<MediaItem, String> {
        let id = require(self.id, "_id")?;
        let src = non_empty(self.image_url).unwrap_or_default();
        let thumbnail = resolve(&[self.thumbnail_url.as_deref(), Some(&src)]);
        let caption = resolve(&[self.caption.as_deref(), self.title.as_deref()]);
        Ok(MediaItem {
            id,
            kind: MediaType::Image,
            src,
            thumbnail,
            platform: platform_or(self.platform, Platform::Instagram),
            categories: category_ids(self.categories),
            title: non_empty(self.title),
            caption,
            is_featured: self.is_featured.unwrap_or(false),
            order: self.order,
            created_at: self.created_at,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoItem {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_createdAt")]
    created_at: Option<DateTime<Utc>>,
    title: Option<String>,
    caption: Option<String>,
    platform: Option<String>,
    url: Option<String>,
    thumbnail_url: Option<String>,
    categories: Option<Vec<Option<RawCategoryRef>>>,
    is_featured: Option<bool>,
    order: Option<f64>,
}

impl Record for RawVideoItem {
    type Output = MediaItem;
    const DOC_TYPE: &'static str = "videoItem";

    fn normalize(self) -> Result<MediaItem, String> {
        let id = require(self.id, "_id")?;
        let platform = platform_or(self.platform, Platform::YouTube);
        let src = non_empty(self.url).unwrap_or_default();
        let thumbnail = thumbnails::video_thumbnail(&src, &platform, self.thumbnail_url.as_deref());
        let caption = resolve(&[self.caption.as_deref(), self.title.as_deref()]);
        Ok(MediaItem {
            id,
            kind: MediaType::Video,
            src,
            thumbnail,
            platform,
            categories: category_ids(self.categories),
            title: non_empty(self.title),
            caption,
            is_featured: self.is_featured.unwrap_or(false),
            order: self.order,
            created_at: self.created_at,
        })
    }
}

#[derive(Deserialize)]
pub struct RawCategory {
    id: Option<String>,
    label: Option<String>,
    description: Option<String>,
    order: Option<f64>,
}

impl Record for RawCategory {
    type Output = Category;
    const DOC_TYPE: &'static str = "category";

    fn normalize(self) -> Result<Category, String> {
        Ok(Category {
            id: require(self.id, "id")?,
            label: require(self.label, "label")?,
            description: non_empty(self.description),
            order: self.order.unwrap_or(0.0),
        })
    }
}

// ============================================================================
// Singletons
// ============================================================================

/// Carousel interval bounds, in seconds.
const CAROUSEL_INTERVAL: std::ops::RangeInclusive<u32> = 3..=10;
const DEFAULT_CAROUSEL_INTERVAL: u32 = 5;

/// The store holds any number here; round to whole seconds within bounds.
fn carousel_interval(secs: Option<f64>) -> u32 {
    let (min, max) = (*CAROUSEL_INTERVAL.start(), *CAROUSEL_INTERVAL.end());
    secs.filter(|s| s.is_finite())
        .map_or(DEFAULT_CAROUSEL_INTERVAL, |s| {
            s.round().clamp(f64::from(min), f64::from(max)) as u32
        })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHero {
    title: Option<String>,
    subtitle: Option<String>,
    location: Option<String>,
    background_image_url: Option<String>,
    background_image_alt: Option<String>,
    hero_image_urls: Option<Vec<Option<String>>>,
    hero_image_alts: Option<Vec<Option<String>>>,
    logo_url: Option<String>,
    logo_alt: Option<String>,
    show_scroll_cue: Option<bool>,
    carousel_auto_play: Option<bool>,
    carousel_interval: Option<f64>,
}

impl Record for RawHero {
    type Output = Hero;
    const DOC_TYPE: &'static str = "hero";

    fn normalize(self) -> Result<Hero, String> {
        let alts = self.hero_image_alts.unwrap_or_default();
        let hero_images = self
            .hero_image_urls
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, url)| image_ref(url, alts.get(i).cloned().flatten()))
            .collect();
        let interval = carousel_interval(self.carousel_interval);
        Ok(Hero {
            title: non_empty(self.title),
            subtitle: non_empty(self.subtitle),
            location: non_empty(self.location),
            background_image: image_ref(self.background_image_url, self.background_image_alt),
            hero_images,
            logo: image_ref(self.logo_url, self.logo_alt),
            show_scroll_cue: self.show_scroll_cue.unwrap_or(true),
            carousel_auto_play: self.carousel_auto_play.unwrap_or(true),
            carousel_interval_secs: interval,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAbout {
    name: Option<String>,
    image_url: Option<String>,
    image_alt: Option<String>,
    bio: Option<String>,
    expertise: Option<Vec<Option<String>>>,
}

impl Record for RawAbout {
    type Output = About;
    const DOC_TYPE: &'static str = "about";

    fn normalize(self) -> Result<About, String> {
        Ok(About {
            name: non_empty(self.name),
            image: image_ref(self.image_url, self.image_alt),
            bio: non_empty(self.bio),
            expertise: self
                .expertise
                .unwrap_or_default()
                .into_iter()
                .filter_map(non_empty)
                .collect(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContact {
    whatsapp_number: Option<String>,
    whatsapp_message: Option<String>,
    phone_number: Option<String>,
    instagram_handle: Option<String>,
    facebook_url: Option<String>,
    youtube_channel_url: Option<String>,
    email: Option<String>,
    show_booking_form: Option<bool>,
    contact_title: Option<String>,
    contact_subtitle: Option<String>,
}

impl Record for RawContact {
    type Output = Contact;
    const DOC_TYPE: &'static str = "contact";

    fn normalize(self) -> Result<Contact, String> {
        Ok(Contact {
            whatsapp_number: non_empty(self.whatsapp_number),
            whatsapp_message: non_empty(self.whatsapp_message),
            phone_number: non_empty(self.phone_number),
            instagram_handle: non_empty(self.instagram_handle),
            facebook_url: non_empty(self.facebook_url),
            youtube_channel_url: non_empty(self.youtube_channel_url),
            email: non_empty(self.email),
            show_booking_form: self.show_booking_form.unwrap_or(false),
            contact_title: non_empty(self.contact_title),
            contact_subtitle: non_empty(self.contact_subtitle),
        })
    }
}

// ============================================================================
// Lists
// ============================================================================

/// A raw testimonial. `is_featured` is kept so the adapter can filter
/// snapshot records the same way the store query does.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTestimonial {
    #[serde(rename = "_id")]
    id: Option<String>,
    quote: Option<String>,
    author_name: Option<String>,
    author_profile_pic_url: Option<String>,
    author_profile_pic_from_url: Option<String>,
    platform: Option<String>,
    event: Option<String>,
    date: Option<DateTime<Utc>>,
    order: Option<f64>,
    is_featured: Option<bool>,
}

/// A testimonial plus the featured flag used for adapter-side filtering.
pub struct TestimonialRecord {
    pub testimonial: Testimonial,
    pub is_featured: bool,
}

impl Record for RawTestimonial {
    type Output = TestimonialRecord;
    const DOC_TYPE: &'static str = "testimonial";

    fn normalize(self) -> Result<TestimonialRecord, String> {
        let author_picture = resolve(&[
            self.author_profile_pic_url.as_deref(),
            self.author_profile_pic_from_url.as_deref(),
        ]);
        Ok(TestimonialRecord {
            testimonial: Testimonial {
                id: require(self.id, "_id")?,
                quote: require(self.quote, "quote")?,
                author_name: require(self.author_name, "authorName")?,
                author_picture,
                platform: non_empty(self.platform).map(|t| Platform::from_tag(&t)),
                event: non_empty(self.event),
                date: self.date,
                order: self.order.unwrap_or(0.0),
            },
            // Only an explicit `true` counts, as in the store's `isFeatured == true`.
            is_featured: self.is_featured.unwrap_or(false),
        })
    }
}

const DEFAULT_GALLERY_LINK_TEXT: &str = "View Album";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEditorialProject {
    #[serde(rename = "_id")]
    id: Option<String>,
    title: Option<String>,
    date: Option<NaiveDate>,
    description: Option<String>,
    image_url: Option<String>,
    image_alt: Option<String>,
    gallery_link: Option<String>,
    gallery_link_text: Option<String>,
    order: Option<f64>,
}

impl Record for RawEditorialProject {
    type Output = EditorialProject;
    const DOC_TYPE: &'static str = "editorial";

    fn normalize(self) -> Result<EditorialProject, String> {
        Ok(EditorialProject {
            id: require(self.id, "_id")?,
            title: require(self.title, "title")?,
            date: self.date,
            description: non_empty(self.description),
            image: image_ref(self.image_url, self.image_alt),
            gallery_link: non_empty(self.gallery_link),
            gallery_link_text: non_empty(self.gallery_link_text)
                .unwrap_or_else(|| DEFAULT_GALLERY_LINK_TEXT.to_string()),
            order: self.order.unwrap_or(0.0),
        })
    }
}
