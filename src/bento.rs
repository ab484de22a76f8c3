//! Bento grid sizing for the featured looks section.
//!
//! ## Algorithm
//!
//! 1. Stable-sort: featured before non-featured; within each group by
//!    `order` ascending, a missing `order` counting as `0`. Equal keys keep
//!    their input order.
//! 2. Walk the sorted list with a zero-based index `i`:
//!
//! | Item | Size | Span (cols × rows) | Aspect |
//! |------|------|--------------------|--------|
//! | featured | large | 2 × 2 | square |
//! | non-featured, `i` even | small | 1 × 1 | square |
//! | non-featured, `i` odd | wide | 2 × 1 | 2:1 |
//!
//! The parity counts featured items too, so one featured item at the front
//! shifts every following non-featured item by one.

use crate::types::MediaItem;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BentoSize {
    Small,
    Large,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    Wide,
}

impl AspectRatio {
    /// Utility class applied to the cell.
    pub fn css_class(self) -> &'static str {
        match self {
            AspectRatio::Square => "aspect-square",
            AspectRatio::Wide => "aspect-[2/1]",
        }
    }
}

/// A media item placed in the bento grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BentoGridItem<'a> {
    pub item: &'a MediaItem,
    pub size: BentoSize,
    pub col_span: u8,
    pub row_span: u8,
    pub aspect: AspectRatio,
}

impl Serialize for BentoGridItem<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("BentoGridItem", 5)?;
        s.serialize_field("mediaItem", self.item)?;
        s.serialize_field("size", &self.size)?;
        s.serialize_field("gridColSpan", &self.col_span)?;
        s.serialize_field("gridRowSpan", &self.row_span)?;
        s.serialize_field("aspectRatio", self.aspect.css_class())?;
        s.end()
    }
}

impl<'a> BentoGridItem<'a> {
    fn place(item: &'a MediaItem, index: usize) -> Self {
        let (size, col_span, row_span, aspect) = if item.is_featured {
            (BentoSize::Large, 2, 2, AspectRatio::Square)
        } else if index % 2 == 0 {
            (BentoSize::Small, 1, 1, AspectRatio::Square)
        } else {
            (BentoSize::Wide, 2, 1, AspectRatio::Wide)
        };
        Self {
            item,
            size,
            col_span,
            row_span,
            aspect,
        }
    }
}

/// Sort and size items for the bento grid. One cell per input item.
pub fn assign_sizes<'a, I>(items: I) -> Vec<BentoGridItem<'a>>
where
    I: IntoIterator<Item = &'a MediaItem>,
{
    let mut sorted: Vec<&MediaItem> = items.into_iter().collect();
    sorted.sort_by(|a, b| {
        b.is_featured
            .cmp(&a.is_featured)
            .then_with(|| a.order.unwrap_or(0.0).total_cmp(&b.order.unwrap_or(0.0)))
    });
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, item)| BentoGridItem::place(item, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn sizes<'a>(cells: &[BentoGridItem<'a>]) -> Vec<(&'a str, BentoSize)> {
        cells.iter().map(|c| (c.item.id.as_str(), c.size)).collect()
    }

    #[test]
    fn empty_input_empty_grid() {
        let items: Vec<MediaItem> = Vec::new();
        assert!(assign_sizes(&items).is_empty());
    }

    #[test]
    fn featured_first_then_parity() {
        let items = vec![
            image("a").with_order(1.0),
            image("b").featured().with_order(5.0),
            image("c").with_order(2.0),
            image("d").with_order(3.0),
        ];
        let cells = assign_sizes(&items);
        assert_eq!(
            sizes(&cells),
            vec![
                ("b", BentoSize::Large),
                ("a", BentoSize::Wide),
                ("c", BentoSize::Small),
                ("d", BentoSize::Wide),
            ]
        );
    }

    #[test]
    fn no_featured_alternates_small_wide() {
        let items = vec![image("a"), image("b"), image("c")];
        let cells = assign_sizes(&items);
        assert_eq!(
            sizes(&cells),
            vec![
                ("a", BentoSize::Small),
                ("b", BentoSize::Wide),
                ("c", BentoSize::Small),
            ]
        );
    }

    #[test]
    fn missing_order_counts_as_zero() {
        let items = vec![
            image("one").with_order(1.0),
            image("none"),
            image("neg").with_order(-1.0),
        ];
        let cells = assign_sizes(&items);
        let ids: Vec<&str> = cells.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, vec!["neg", "none", "one"]);
    }

    #[test]
    fn equal_keys_are_stable() {
        let items = vec![
            image("x").featured(),
            image("y").featured(),
            image("p").with_order(0.0),
            image("q"),
        ];
        let cells = assign_sizes(&items);
        let ids: Vec<&str> = cells.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "p", "q"]);
    }

    #[test]
    fn spans_and_aspects() {
        let items = vec![image("f").featured(), image("s"), image("w")];
        let cells = assign_sizes(&items);
        // The featured cell at index 0 shifts parity: "s" lands on index 1.
        assert_eq!((cells[0].col_span, cells[0].row_span), (2, 2));
        assert_eq!(cells[0].aspect, AspectRatio::Square);
        assert_eq!(cells[1].size, BentoSize::Wide);
        assert_eq!((cells[1].col_span, cells[1].row_span), (2, 1));
        assert_eq!(cells[1].aspect.css_class(), "aspect-[2/1]");
        assert_eq!(cells[2].size, BentoSize::Small);
        assert_eq!(cells[2].aspect.css_class(), "aspect-square");
    }

    #[test]
    fn same_cardinality() {
        let items: Vec<MediaItem> = (0..7).map(|i| image(&format!("m{i}"))).collect();
        assert_eq!(assign_sizes(&items).len(), items.len());
    }

    #[test]
    fn serializes_with_grid_field_names() {
        let items = vec![image("a")];
        let value = serde_json::to_value(assign_sizes(&items)).unwrap();
        assert_eq!(value[0]["size"], "small");
        assert_eq!(value[0]["gridColSpan"], 1);
        assert_eq!(value[0]["aspectRatio"], "aspect-square");
        assert_eq!(value[0]["mediaItem"]["id"], "a");
    }
}
