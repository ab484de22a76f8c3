//! Category filtering for the portfolio grid.

use crate::types::MediaItem;

/// The order-preserving subsequence of `items` tagged with `category_id`.
///
/// `None` means "All" and returns every item. Items with no categories
/// never match a specific category.
pub fn filter_by_category<'a>(
    items: &'a [MediaItem],
    category_id: Option<&str>,
) -> Vec<&'a MediaItem> {
    match category_id {
        None => items.iter().collect(),
        Some(id) => items.iter().filter(|item| item.in_category(id)).collect(),
    }
}
