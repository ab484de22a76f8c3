//! Page assembly.
//!
//! Each page handler gathers the collections it needs from the
//! [`ContentSource`] concurrently, then runs the derived views over them.
//!
//! ## Critical and non-critical sections
//!
//! A page is only worth showing if its core content loaded. Everything else
//! degrades to an empty section with a `warn!` log:
//!
//! | Page | Critical | Degrades |
//! |------|----------|----------|
//! | `/` | media items, categories | hero, featured, videos, testimonials, about, contact |
//! | `/portfolio` | media items, categories | hero (logo) |
//! | `/portfolio/view/{n}` | media items | |
//! | `/videos` | videos | hero (logo) |
//! | `/about` | about | hero (logo), contact |
//! | `/contact` | contact | hero (logo) |
//! | `/editorial` | editorial projects | hero (logo) |
//!
//! A critical failure surfaces as [`PageError::Source`]; the server turns it
//! into the error page. A degraded section is recorded in the page's
//! [`Degraded`] list so the server knows not to cache the result.
//!
//! [`PAGE_SOURCES`] lists every document type each page reads, critical or
//! not. Revalidation uses it to decide which pages a change touches.

use crate::bento::assign_sizes;
use crate::cards::{all_card, category_cards};
use crate::config::LayoutConfig;
use crate::filter::filter_by_category;
use crate::navigator::IndexNavigator;
use crate::platform::partition_by_platform;
use crate::reveal::Reveal;
use crate::source::{ContentSource, SourceError};
use crate::types::{
    About, AllCard, Category, CategoryCard, Contact, EditorialProject, Hero, ImageRef, MediaItem,
    Platform, Testimonial,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Document types read by each page and everything below it.
pub const PAGE_SOURCES: &[(&str, &[&str])] = &[
    (
        "/",
        &["about", "category", "contact", "hero", "mediaItem", "testimonial", "videoItem"],
    ),
    ("/portfolio", &["category", "hero", "mediaItem"]),
    ("/videos", &["hero", "videoItem"]),
    ("/about", &["about", "contact", "hero"]),
    ("/contact", &["contact", "hero"]),
    ("/editorial", &["editorial", "hero"]),
];

/// Pages showing documents of `doc_type`, in [`PAGE_SOURCES`] order.
/// An unknown or missing type touches every page.
pub fn pages_reading(doc_type: Option<&str>) -> Vec<&'static str> {
    let known = doc_type.filter(|t| PAGE_SOURCES.iter().any(|(_, types)| types.contains(t)));
    PAGE_SOURCES
        .iter()
        .filter(|(_, types)| known.is_none_or(|t| types.contains(&t)))
        .map(|(path, _)| *path)
        .collect()
}

/// Non-critical sections that fell back to empty while a page was built.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Degraded(Vec<&'static str>);

impl Degraded {
    /// Keep a non-critical section, or log, record and fall back to its
    /// empty value.
    fn keep<T: Default>(&mut self, section: &'static str, result: Result<T, SourceError>) -> T {
        result.unwrap_or_else(|error| {
            warn!(section, %error, "section unavailable, rendering without it");
            self.0.push(section);
            T::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sections(&self) -> &[&'static str] {
        &self.0
    }
}

/// The header logo from a hero fetch. A failed fetch degrades to no logo.
fn header_logo(
    degraded: &mut Degraded,
    hero: Result<Option<Hero>, SourceError>,
) -> Option<ImageRef> {
    degraded.keep("hero", hero).and_then(|h| h.logo)
}

// ============================================================================
// Home
// ============================================================================

pub struct HomePage {
    pub hero: Option<Hero>,
    pub all_card: AllCard,
    pub category_cards: Vec<CategoryCard>,
    pub featured: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub testimonials: Vec<Testimonial>,
    pub about: Option<About>,
    pub contact: Option<Contact>,
    pub degraded: Degraded,
}

pub async fn home(source: &ContentSource, layout: &LayoutConfig) -> Result<HomePage, PageError> {
    let (hero, media, featured, videos, categories, about, contact, testimonials) = tokio::join!(
        source.get_hero(),
        source.get_media_items(false),
        source.get_media_items(true),
        source.get_video_items(None),
        source.get_categories(),
        source.get_about(),
        source.get_contact(),
        source.get_testimonials(Some(layout.testimonials_limit)),
    );
    let media = media?;
    let categories = categories?;

    let mut degraded = Degraded::default();
    let mut featured = degraded.keep("featured", featured);
    featured.truncate(layout.featured_limit);

    Ok(HomePage {
        hero: degraded.keep("hero", hero),
        all_card: all_card(&media),
        category_cards: category_cards(&categories, &media),
        featured,
        videos: degraded.keep("videos", videos),
        testimonials: degraded.keep("testimonials", testimonials),
        about: degraded.keep("about", about),
        contact: degraded.keep("contact", contact),
        degraded,
    })
}

// ============================================================================
// Portfolio grid and lightbox
// ============================================================================

pub struct PortfolioPage {
    pub categories: Vec<Category>,
    pub active_category: Option<String>,
    /// Filtered media, revealed up to the requested page.
    pub reveal: Reveal<MediaItem>,
    /// Load-more steps already applied.
    pub page: usize,
    pub logo: Option<ImageRef>,
    pub degraded: Degraded,
}

/// The portfolio grid. `page` is the number of "load more" steps to expose
/// on top of the initial batch.
pub async fn portfolio(
    source: &ContentSource,
    layout: &LayoutConfig,
    category: Option<&str>,
    page: usize,
) -> Result<PortfolioPage, PageError> {
    let (media, categories, hero) = tokio::join!(
        source.get_media_items(false),
        source.get_categories(),
        source.get_hero(),
    );
    let media = media?;
    let categories = categories?;

    let filtered: Vec<MediaItem> = filter_by_category(&media, category)
        .into_iter()
        .cloned()
        .collect();
    let mut reveal = Reveal::init(filtered, layout.initial_batch);
    let mut applied = 0;
    while applied < page && reveal.load_more(layout.load_more_batch) {
        applied += 1;
    }

    let mut degraded = Degraded::default();
    Ok(PortfolioPage {
        categories,
        active_category: category.map(str::to_string),
        reveal,
        page: applied,
        logo: header_logo(&mut degraded, hero),
        degraded,
    })
}

pub struct LightboxPage {
    pub active_category: Option<String>,
    pub navigator: IndexNavigator<MediaItem>,
}

/// A single item of the (optionally filtered) portfolio.
pub async fn lightbox(
    source: &ContentSource,
    category: Option<&str>,
    index: usize,
) -> Result<LightboxPage, PageError> {
    let media = source.get_media_items(false).await?;
    let filtered: Vec<MediaItem> = filter_by_category(&media, category)
        .into_iter()
        .cloned()
        .collect();
    let navigator = IndexNavigator::new(filtered, index)
        .map_err(|e| PageError::NotFound(format!("portfolio item: {e}")))?;
    Ok(LightboxPage {
        active_category: category.map(str::to_string),
        navigator,
    })
}

// ============================================================================
// Secondary pages
// ============================================================================

pub struct VideosPage {
    /// `None` shows every enabled platform.
    pub platform: Option<Platform>,
    pub videos: Vec<MediaItem>,
    pub logo: Option<ImageRef>,
    pub degraded: Degraded,
}

pub async fn videos(
    source: &ContentSource,
    platform: Option<Platform>,
) -> Result<VideosPage, PageError> {
    let (videos, hero) = tokio::join!(source.get_video_items(platform.clone()), source.get_hero());
    let videos = videos?;
    let mut degraded = Degraded::default();
    Ok(VideosPage {
        platform,
        videos,
        logo: header_logo(&mut degraded, hero),
        degraded,
    })
}

pub struct AboutPage {
    pub about: Option<About>,
    pub contact: Option<Contact>,
    pub logo: Option<ImageRef>,
    pub degraded: Degraded,
}

pub async fn about(source: &ContentSource) -> Result<AboutPage, PageError> {
    let (about, contact, hero) =
        tokio::join!(source.get_about(), source.get_contact(), source.get_hero());
    let about = about?;
    let mut degraded = Degraded::default();
    Ok(AboutPage {
        about,
        contact: degraded.keep("contact", contact),
        logo: header_logo(&mut degraded, hero),
        degraded,
    })
}

pub struct ContactPage {
    pub contact: Option<Contact>,
    pub logo: Option<ImageRef>,
    pub degraded: Degraded,
}

pub async fn contact(source: &ContentSource) -> Result<ContactPage, PageError> {
    let (contact, hero) = tokio::join!(source.get_contact(), source.get_hero());
    let contact = contact?;
    let mut degraded = Degraded::default();
    Ok(ContactPage {
        contact,
        logo: header_logo(&mut degraded, hero),
        degraded,
    })
}

pub struct EditorialPage {
    pub projects: Vec<EditorialProject>,
    pub logo: Option<ImageRef>,
    pub degraded: Degraded,
}

pub async fn editorial(source: &ContentSource) -> Result<EditorialPage, PageError> {
    let (projects, hero) = tokio::join!(source.get_editorial_projects(), source.get_hero());
    let projects = projects?;
    let mut degraded = Degraded::default();
    Ok(EditorialPage {
        projects,
        logo: header_logo(&mut degraded, hero),
        degraded,
    })
}

// ============================================================================
// Content inventory (CLI `check`)
// ============================================================================

/// Every collection the site renders, loaded in full. Unlike the pages,
/// any failed fetch fails the whole inventory.
pub struct Inventory {
    pub categories: Vec<Category>,
    pub media: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub testimonials: Vec<Testimonial>,
    pub editorial: Vec<EditorialProject>,
    pub hero: Option<Hero>,
    pub about: Option<About>,
    pub contact: Option<Contact>,
}

pub async fn inventory(source: &ContentSource) -> Result<Inventory, SourceError> {
    let (categories, media, videos, testimonials, editorial, hero, about, contact) = tokio::join!(
        source.get_categories(),
        source.get_media_items(false),
        source.get_video_items(None),
        source.get_testimonials(None),
        source.get_editorial_projects(),
        source.get_hero(),
        source.get_about(),
        source.get_contact(),
    );
    Ok(Inventory {
        categories: categories?,
        media: media?,
        videos: videos?,
        testimonials: testimonials?,
        editorial: editorial?,
        hero: hero?,
        about: about?,
        contact: contact?,
    })
}

// ============================================================================
// Derived-view dump (CLI `views`)
// ============================================================================

/// Every derived view for one category filter, as JSON.
pub async fn derived_views(
    source: &ContentSource,
    layout: &LayoutConfig,
    category: Option<&str>,
) -> Result<serde_json::Value, PageError> {
    let (media, videos, categories) = tokio::join!(
        source.get_media_items(false),
        source.get_video_items(None),
        source.get_categories(),
    );
    let (media, videos, categories) = (media?, videos?, categories?);

    let filtered = filter_by_category(&media, category);
    let reveal = Reveal::init(filtered.clone(), layout.initial_batch);
    let window: Vec<&str> = reveal.visible().iter().map(|m| m.id.as_str()).collect();

    Ok(json!({
        "category": category,
        "allCard": all_card(&media),
        "categoryCards": category_cards(&categories, &media),
        "filtered": filtered.iter().map(|m| &m.id).collect::<Vec<_>>(),
        "firstBatch": { "ids": window, "hasMore": reveal.has_more() },
        "bento": assign_sizes(reveal.visible().iter().copied()),
        "videos": partition_by_platform(&videos),
    }))
}
