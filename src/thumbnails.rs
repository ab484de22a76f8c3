//! Video thumbnail derivation.
//!
//! Editors rarely upload a thumbnail for a video record; YouTube exposes a
//! predictable still for every video ID, so the adapter derives one from the
//! video URL when none is provided. Instagram has no derivable still: reels
//! render through their embed instead.
//!
//! ```text
//! https://youtu.be/dQw4w9WgXcQ                 → dQw4w9WgXcQ
//! https://www.youtube.com/watch?v=dQw4w9WgXcQ  → dQw4w9WgXcQ
//! https://www.youtube.com/shorts/dQw4w9WgXcQ   → dQw4w9WgXcQ
//! https://www.instagram.com/reel/Cx1_abc/      → Cx1_abc
//! ```

use crate::types::Platform;
use regex::Regex;
use std::sync::LazyLock;

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtu\.be/|youtube\.com/(?:shorts/|watch\?v=|embed/|v/|u/\w/|.*[&?]v=))([a-zA-Z0-9_-]{11})",
    )
    .expect("youtube id pattern is valid")
});

static INSTAGRAM_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"instagram\.com/(?:p|reel)/([a-zA-Z0-9_-]+)").expect("instagram id pattern is valid")
});

static BARE_YOUTUBE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("bare id pattern is valid"));

/// Still-image sizes YouTube publishes for every video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailQuality {
    #[default]
    MaxRes,
    High,
    Medium,
    Standard,
}

impl ThumbnailQuality {
    fn file_stem(self) -> &'static str {
        match self {
            ThumbnailQuality::MaxRes => "maxresdefault",
            ThumbnailQuality::High => "hqdefault",
            ThumbnailQuality::Medium => "mqdefault",
            ThumbnailQuality::Standard => "sddefault",
        }
    }
}

/// Extract the 11-character video ID from any common YouTube URL form.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    if url.is_empty() {
        return None;
    }
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Thumbnail URL for a YouTube video ID or URL.
///
/// An input that is itself a well-formed 11-character ID is used directly.
pub fn youtube_thumbnail(id_or_url: &str, quality: ThumbnailQuality) -> Option<String> {
    let id = if BARE_YOUTUBE_ID.is_match(id_or_url) {
        id_or_url
    } else {
        youtube_video_id(id_or_url)?
    };
    Some(format!(
        "https://img.youtube.com/vi/{id}/{}.jpg",
        quality.file_stem()
    ))
}

/// Extract the post or reel ID from an Instagram URL.
pub fn instagram_post_id(url: &str) -> Option<&str> {
    INSTAGRAM_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Pick the thumbnail to show for a video.
///
/// A provided, non-empty thumbnail always wins. Otherwise YouTube thumbnails
/// are derived from the URL; other platforms get none.
pub fn video_thumbnail(url: &str, platform: &Platform, provided: Option<&str>) -> Option<String> {
    if let Some(thumb) = provided.filter(|t| !t.trim().is_empty()) {
        return Some(thumb.to_string());
    }
    match platform {
        Platform::YouTube => youtube_thumbnail(url, ThumbnailQuality::MaxRes),
        _ => None,
    }
}
