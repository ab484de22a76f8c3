//! Splits a combined video list into the reels and long-form sections.

use crate::types::{MediaItem, Platform};
use serde::Serialize;

/// Videos bucketed by platform, each bucket in input order.
///
/// `primary` holds Instagram reels. `secondary` holds YouTube long-form
/// videos and anything with an unrecognised platform tag, so no item is
/// ever dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformBuckets<'a> {
    pub primary: Vec<&'a MediaItem>,
    pub secondary: Vec<&'a MediaItem>,
}

impl PlatformBuckets<'_> {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

pub fn partition_by_platform<'a, I>(videos: I) -> PlatformBuckets<'a>
where
    I: IntoIterator<Item = &'a MediaItem>,
{
    let (primary, secondary) = videos
        .into_iter()
        .partition(|video| video.platform == Platform::Instagram);
    PlatformBuckets { primary, secondary }
}
