//! Representative image selection.
//!
//! Picks the one image that stands for a set of media: the cover of a
//! category card, or of the "All" card.
//!
//! ## Rule
//!
//! 1. Empty input has no representative.
//! 2. If anything is featured, the first featured item in source order wins.
//! 3. Otherwise take the minimum under:
//!    - items with an `order` before items without, ascending by `order`;
//!    - among items without an `order`, newest `created_at` first, and
//!      timestamped items before untimestamped ones;
//!    - anything still tied keeps source order (the earlier item wins).
//!
//! This differs from the bento sort, which treats a missing `order` as `0`.
//! The two must not share a comparator.

use crate::types::MediaItem;
use std::cmp::Ordering;

/// Select the representative item of a (usually per-category) set.
pub fn select_representative<'a, I>(items: I) -> Option<&'a MediaItem>
where
    I: IntoIterator<Item = &'a MediaItem>,
{
    let mut first_featured = None;
    let mut best: Option<&MediaItem> = None;
    for item in items {
        if item.is_featured {
            first_featured = Some(item);
            break;
        }
        best = match best {
            Some(current) if representative_cmp(item, current) != Ordering::Less => Some(current),
            _ => Some(item),
        };
    }
    first_featured.or(best)
}

/// Select the cover of the "All" card from the unfiltered collection.
pub fn select_all_card_image(items: &[MediaItem]) -> Option<&MediaItem> {
    select_representative(items)
}

fn representative_cmp(a: &MediaItem, b: &MediaItem) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (a.created_at, b.created_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn empty_has_no_representative() {
        let items: Vec<MediaItem> = Vec::new();
        assert!(select_representative(&items).is_none());
        assert!(select_all_card_image(&items).is_none());
    }

    #[test]
    fn first_featured_wins_regardless_of_order() {
        let items = vec![
            image("a").with_order(1.0),
            image("b").featured().with_order(9.0),
            image("c").featured().with_order(0.0),
        ];
        assert_eq!(select_representative(&items).unwrap().id, "b");
    }

    #[test]
    fn lowest_order_wins_without_featured() {
        let items = vec![image("a").with_order(3.0), image("b").with_order(1.0), image("c")];
        assert_eq!(select_representative(&items).unwrap().id, "b");
    }

    #[test]
    fn ordered_beats_newer_unordered() {
        let items = vec![
            image("new").created(at("2025-01-01T00:00:00Z")),
            image("ordered").with_order(50.0),
        ];
        assert_eq!(select_representative(&items).unwrap().id, "ordered");
    }

    #[test]
    fn newest_wins_among_unordered() {
        let items = vec![
            image("untimed"),
            image("old").created(at("2023-01-01T00:00:00Z")),
            image("new").created(at("2024-01-01T00:00:00Z")),
        ];
        assert_eq!(select_representative(&items).unwrap().id, "new");
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let items = vec![image("a").with_order(1.0), image("b").with_order(1.0)];
        assert_eq!(select_representative(&items).unwrap().id, "a");

        let untimed = vec![image("x"), image("y")];
        assert_eq!(select_representative(&untimed).unwrap().id, "x");
    }

    #[test]
    fn deterministic_across_calls() {
        let items = vec![
            image("a"),
            image("b").created(at("2024-03-01T00:00:00Z")),
            image("c").with_order(2.0),
            image("d").with_order(2.0),
        ];
        let first = select_representative(&items).unwrap().id.clone();
        for _ in 0..10 {
            assert_eq!(select_representative(&items).unwrap().id, first);
        }
        assert_eq!(first, "c");
    }

    #[test]
    fn works_over_filtered_references() {
        let items = vec![image("a").with_order(2.0), image("b").with_order(1.0)];
        let refs: Vec<&MediaItem> = items.iter().collect();
        assert_eq!(
            select_representative(refs.iter().copied()).unwrap().id,
            "b"
        );
    }
}
