//! Shared entity types used across the adapter, derived views, and renderers.
//!
//! Every type here is the *normalized* shape: defaults have already been
//! applied by [`crate::source::records`], so downstream code never has to
//! guess what a missing field means. The derived-view modules borrow these
//! read-only and return new structures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a media item is a still image or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// Hosting platform tag.
///
/// Parsing is case-sensitive on the store's tags. Anything unrecognised is
/// kept verbatim in `Other` so it can still be bucketed and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Instagram,
    YouTube,
    Other(String),
}

impl Platform {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "instagram" => Platform::Instagram,
            "youtube" => Platform::YouTube,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Platform::Instagram => "instagram",
            Platform::YouTube => "youtube",
            Platform::Other(tag) => tag,
        }
    }

    /// Human label for headings and badges.
    pub fn label(&self) -> &str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
            Platform::Other(tag) => tag,
        }
    }
}

impl From<String> for Platform {
    fn from(tag: String) -> Self {
        Platform::from_tag(&tag)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_tag().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A single portfolio image or video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
    /// Full-size URL. Empty when the store had no resolvable asset.
    pub src: String,
    pub thumbnail: Option<String>,
    pub platform: Platform,
    /// Category ids in source order. Never null.
    pub categories: Vec<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub is_featured: bool,
    pub order: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl MediaItem {
    /// Thumbnail for grid display, falling back to the full-size source.
    pub fn display_thumbnail(&self) -> &str {
        match self.thumbnail.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => &self.src,
        }
    }

    pub fn in_category(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c == category_id)
    }
}

/// A portfolio category (bridal, party, mehendi, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub order: f64,
}

/// An image prepared for a collage card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollageImage {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub thumbnail: Option<String>,
}

/// A home-page card linking to one category of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub category_id: String,
    pub category_label: String,
    pub description: Option<String>,
    pub template_image: CollageImage,
    pub href: String,
    pub order: f64,
}

/// The "All" card linking to the unfiltered portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllCard {
    pub label: String,
    pub template_image: CollageImage,
    pub href: String,
}

/// A resolved image reference with optional alt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub location: Option<String>,
    pub background_image: Option<ImageRef>,
    pub hero_images: Vec<ImageRef>,
    pub logo: Option<ImageRef>,
    pub show_scroll_cue: bool,
    pub carousel_auto_play: bool,
    pub carousel_interval_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub name: Option<String>,
    pub image: Option<ImageRef>,
    /// Plain text; may carry markdown emphasis.
    pub bio: Option<String>,
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub whatsapp_number: Option<String>,
    pub whatsapp_message: Option<String>,
    pub phone_number: Option<String>,
    pub instagram_handle: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_channel_url: Option<String>,
    pub email: Option<String>,
    pub show_booking_form: bool,
    pub contact_title: Option<String>,
    pub contact_subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub quote: String,
    pub author_name: String,
    pub author_picture: Option<String>,
    pub platform: Option<Platform>,
    pub event: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorialProject {
    pub id: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    pub gallery_link: Option<String>,
    pub gallery_link_text: String,
    pub order: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::image;

    #[test]
    fn platform_tags_roundtrip() {
        assert_eq!(Platform::from_tag("instagram"), Platform::Instagram);
        assert_eq!(Platform::from_tag("youtube"), Platform::YouTube);
        assert_eq!(
            Platform::from_tag("YouTube"),
            Platform::Other("YouTube".into())
        );
        assert_eq!(Platform::Other("tiktok".into()).as_tag(), "tiktok");
    }

    #[test]
    fn platform_serializes_as_plain_tag() {
        let json = serde_json::to_string(&Platform::YouTube).unwrap();
        assert_eq!(json, "\"youtube\"");
        let parsed: Platform = serde_json::from_str("\"vimeo\"").unwrap();
        assert_eq!(parsed, Platform::Other("vimeo".into()));
    }

    #[test]
    fn display_thumbnail_falls_back_to_src() {
        let mut item = image("a");
        item.src = "full.jpg".into();
        item.thumbnail = None;
        assert_eq!(item.display_thumbnail(), "full.jpg");

        item.thumbnail = Some(String::new());
        assert_eq!(item.display_thumbnail(), "full.jpg");

        item.thumbnail = Some("thumb.jpg".into());
        assert_eq!(item.display_thumbnail(), "thumb.jpg");
    }

    #[test]
    fn media_item_serializes_kind_as_type() {
        let item = image("a");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["isFeatured"], false);
        assert_eq!(value["platform"], "instagram");
    }
}
