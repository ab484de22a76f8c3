//! Home-page category cards.
//!
//! Each category gets one card whose cover is the representative image of
//! that category's media. A category with no media still gets a card, with a
//! placeholder cover so the carousel keeps its shape.

use crate::filter::filter_by_category;
use crate::select::{select_all_card_image, select_representative};
use crate::types::{AllCard, Category, CategoryCard, CollageImage, MediaItem};

fn collage_image(item: &MediaItem, fallback_alt: String) -> CollageImage {
    CollageImage {
        id: item.id.clone(),
        src: item.display_thumbnail().to_string(),
        alt: item.caption.clone().unwrap_or(fallback_alt),
        thumbnail: item.thumbnail.clone(),
    }
}

fn placeholder(id: String, alt: String) -> CollageImage {
    CollageImage {
        id,
        src: String::new(),
        alt,
        thumbnail: None,
    }
}

/// One card per category, in category order.
pub fn category_cards(categories: &[Category], media: &[MediaItem]) -> Vec<CategoryCard> {
    categories
        .iter()
        .map(|category| {
            let in_category = filter_by_category(media, Some(&category.id));
            let template_image = match select_representative(in_category) {
                Some(item) => {
                    collage_image(item, format!("Image from {} category", category.label))
                }
                None => placeholder(
                    format!("placeholder-{}", category.id),
                    format!("{} placeholder", category.label),
                ),
            };
            CategoryCard {
                category_id: category.id.clone(),
                category_label: category.label.clone(),
                description: category.description.clone(),
                template_image,
                href: format!("/portfolio?category={}", category.id),
                order: category.order,
            }
        })
        .collect()
}

/// The card linking to the unfiltered portfolio.
pub fn all_card(media: &[MediaItem]) -> AllCard {
    let template_image = match select_all_card_image(media) {
        Some(item) => collage_image(item, "Featured image".to_string()),
        None => placeholder(
            "placeholder-all".to_string(),
            "All categories placeholder".to_string(),
        ),
    };
    AllCard {
        label: "All".to_string(),
        template_image,
        href: "/portfolio".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn card_uses_representative_thumbnail() {
        let categories = vec![category("bridal", "Bridal")];
        let mut cover = image("m2").in_categories(&["bridal"]).featured();
        cover.thumbnail = Some("thumb-2.jpg".into());
        cover.caption = Some("Red lehenga".into());
        let media = vec![image("m1").in_categories(&["bridal"]), cover];

        let cards = category_cards(&categories, &media);
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.template_image.id, "m2");
        assert_eq!(card.template_image.src, "thumb-2.jpg");
        assert_eq!(card.template_image.alt, "Red lehenga");
        assert_eq!(card.href, "/portfolio?category=bridal");
    }

    #[test]
    fn alt_falls_back_to_category_label() {
        let categories = vec![category("party", "Party")];
        let media = vec![image("m1").in_categories(&["party"])];
        let cards = category_cards(&categories, &media);
        assert_eq!(cards[0].template_image.alt, "Image from Party category");
        assert_eq!(cards[0].template_image.src, "https://cdn.example/m1.jpg");
    }

    #[test]
    fn empty_category_gets_placeholder() {
        let categories = vec![category("mehendi", "Mehendi")];
        let cards = category_cards(&categories, &[]);
        let cover = &cards[0].template_image;
        assert_eq!(cover.id, "placeholder-mehendi");
        assert_eq!(cover.src, "");
        assert_eq!(cover.alt, "Mehendi placeholder");
    }

    #[test]
    fn cards_follow_category_order() {
        let categories = vec![category("b", "B"), category("a", "A")];
        let cards = category_cards(&categories, &[]);
        let ids: Vec<&str> = cards.iter().map(|c| c.category_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn all_card_picks_from_everything() {
        let media = vec![image("x").with_order(2.0), image("y").with_order(1.0)];
        let card = all_card(&media);
        assert_eq!(card.label, "All");
        assert_eq!(card.href, "/portfolio");
        assert_eq!(card.template_image.id, "y");
        assert_eq!(card.template_image.alt, "Featured image");
    }

    #[test]
    fn all_card_placeholder() {
        let card = all_card(&[]);
        assert_eq!(card.template_image.id, "placeholder-all");
        assert_eq!(card.template_image.alt, "All categories placeholder");
    }
}
