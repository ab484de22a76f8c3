//! CLI output formatting for the `check` command.
//!
//! # Information-First Display
//!
//! Output is a **content inventory**: every entity is shown by its semantic
//! identity (positional index + label) with supporting facts on indented
//! context lines. For categories the most useful fact is which image the
//! home page will use as the card cover, and why that one was picked.
//!
//! # Output Format
//!
//! ```text
//! Categories
//! 001 Bridal (12 items)
//!     Cover: m-204 "Red lehenga" (featured)
//!     Description: Complete bridal looks for the big day
//! 002 Mehendi (0 items)
//!     Cover: placeholder
//!
//! All
//!     Cover: m-101 (order 1)
//!
//! Media
//!     24 images, 3 featured, 2 uncategorised
//!
//! Videos
//!     Reels: 0
//!     Long-form: 4
//!
//! Pages
//!     Hero: present (3 carousel images)
//!     About: present
//!     Contact: missing
//!     Testimonials: 6 featured
//!     Editorial: 3 projects
//! ```
//!
//! # Architecture
//!
//! [`format_check_output`] returns `Vec<String>` for testability and
//! [`print_check_output`] writes it to stdout. The format function is pure:
//! no I/O, no side effects.

use crate::filter::filter_by_category;
use crate::pages::Inventory;
use crate::platform::partition_by_platform;
use crate::select::{select_all_card_image, select_representative};
use crate::types::MediaItem;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + label, with optional count.
///
/// ```text
/// 001 Bridal (12 items)
/// 002 Party
/// ```
fn entity_header(index: usize, label: &str, count: Option<usize>) -> String {
    match count {
        Some(1) => format!("{} {} (1 item)", format_index(index), label),
        Some(n) => format!("{} {} ({} items)", format_index(index), label, n),
        None => format!("{} {}", format_index(index), label),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Why the selection rule landed on `item`.
fn selection_reason(item: &MediaItem) -> String {
    if item.is_featured {
        "featured".to_string()
    } else if let Some(order) = item.order {
        format!("order {order}")
    } else if item.created_at.is_some() {
        "newest".to_string()
    } else {
        "first".to_string()
    }
}

/// `Cover:` line for a card, or the placeholder marker.
fn cover_line(item: Option<&MediaItem>) -> String {
    match item {
        Some(item) => match &item.caption {
            Some(caption) => format!(
                "Cover: {} \"{}\" ({})",
                item.id,
                truncate_desc(caption, 40),
                selection_reason(item)
            ),
            None => format!("Cover: {} ({})", item.id, selection_reason(item)),
        },
        None => "Cover: placeholder".to_string(),
    }
}

fn presence(present: bool) -> &'static str {
    if present { "present" } else { "missing" }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(inventory: &Inventory) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Categories".to_string());
    if inventory.categories.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, category) in inventory.categories.iter().enumerate() {
        let items = filter_by_category(&inventory.media, Some(&category.id));
        lines.push(entity_header(i + 1, &category.label, Some(items.len())));
        let cover = select_representative(items.iter().copied());
        lines.push(format!("{}{}", indent(1), cover_line(cover)));
        if let Some(description) = &category.description {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(description, 60)
            ));
        }
    }

    lines.push(String::new());
    lines.push("All".to_string());
    lines.push(format!(
        "{}{}",
        indent(1),
        cover_line(select_all_card_image(&inventory.media))
    ));

    let featured = inventory.media.iter().filter(|m| m.is_featured).count();
    let uncategorised = inventory
        .media
        .iter()
        .filter(|m| m.categories.is_empty())
        .count();
    lines.push(String::new());
    lines.push("Media".to_string());
    lines.push(format!(
        "{}{} images, {} featured, {} uncategorised",
        indent(1),
        inventory.media.len(),
        featured,
        uncategorised
    ));

    let buckets = partition_by_platform(&inventory.videos);
    lines.push(String::new());
    lines.push("Videos".to_string());
    lines.push(format!("{}Reels: {}", indent(1), buckets.primary.len()));
    lines.push(format!("{}Long-form: {}", indent(1), buckets.secondary.len()));

    lines.push(String::new());
    lines.push("Pages".to_string());
    let hero = match &inventory.hero {
        Some(hero) => format!("present ({} carousel images)", hero.hero_images.len()),
        None => presence(false).to_string(),
    };
    lines.push(format!("{}Hero: {}", indent(1), hero));
    lines.push(format!(
        "{}About: {}",
        indent(1),
        presence(inventory.about.is_some())
    ));
    lines.push(format!(
        "{}Contact: {}",
        indent(1),
        presence(inventory.contact.is_some())
    ));
    lines.push(format!(
        "{}Testimonials: {} featured",
        indent(1),
        inventory.testimonials.len()
    ));
    lines.push(format!(
        "{}Editorial: {} projects",
        indent(1),
        inventory.editorial.len()
    ));

    lines
}

pub fn print_check_output(inventory: &Inventory) {
    for line in format_check_output(inventory) {
        println!("{}", line);
    }
}
