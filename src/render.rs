//! HTML page rendering.
//!
//! Turns the view models from [`crate::pages`] into complete HTML documents.
//! Every page shares one document shell, the site header and the slide-out
//! navigation; the per-page functions only fill in `main`.
//!
//! ## Pages
//!
//! - **Home** (`/`): hero carousel, category cards, featured bento, video
//!   sections, testimonials, about teaser, contact
//! - **Portfolio** (`/portfolio`): category filter bar, the revealed window
//!   as uniform tiles in list order, "Load more" link
//! - **Lightbox** (`/portfolio/view/{n}`): one item with wrap-around prev/next
//! - **Videos**, **About**, **Contact**, **Editorial**
//! - **Not found** and **error** pages
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles and grid spans
//! - `static/nav.js`: keyboard and swipe navigation for the lightbox and the
//!   hero carousel
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! so every interpolated store value is escaped.

use crate::bento::{BentoGridItem, BentoSize, assign_sizes};
use crate::config::SiteInfo;
use crate::pages::{
    AboutPage, ContactPage, EditorialPage, HomePage, LightboxPage, PortfolioPage, VideosPage,
};
use crate::platform::{PlatformBuckets, partition_by_platform};
use crate::thumbnails;
use crate::types::{
    About, CollageImage, Contact, EditorialProject, Hero, ImageRef, MediaItem, MediaType,
    Platform, Testimonial,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use reqwest::Url;
use url::form_urlencoded;

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

const DEFAULT_WHATSAPP_MESSAGE: &str = "Hi! I'd like to know more about your services.";

/// Top-level navigation: (path, label).
const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/portfolio", "Portfolio"),
    ("/videos", "Videos"),
    ("/editorial", "Editorial"),
    ("/about", "About"),
    ("/contact", "Contact"),
];

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body class=[body_class] {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

fn page_title(site: &SiteInfo, section: Option<&str>) -> String {
    match section {
        Some(section) => format!("{section} | {}", site.name),
        None => format!("{} | {}", site.name, site.tagline),
    }
}

/// Renders the site header with brand and navigation
fn site_header(site: &SiteInfo, current_path: &str, logo: Option<&ImageRef>) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" {
                @if let Some(logo) = logo {
                    img.logo src=(logo.url) alt=(logo.alt.as_deref().unwrap_or(&site.name));
                } @else {
                    (site.name)
                }
            }
            nav.site-nav {
                (render_nav(current_path))
            }
        }
    }
}

/// Renders the navigation menu (hamburger style, slides from right)
pub fn render_nav(current_path: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        div.nav-panel {
            label.nav-close for="nav-toggle" { "×" }
            ul {
                @for (path, label) in NAV_LINKS {
                    li class=[is_current(path, current_path).then_some("current")] {
                        a href=(path) { (label) }
                    }
                }
            }
        }
    }
}

fn is_current(link: &str, current_path: &str) -> bool {
    if link == "/" {
        return current_path == "/";
    }
    current_path == link || current_path.starts_with(&format!("{link}/"))
}

fn site_footer(site: &SiteInfo) -> Markup {
    html! {
        footer.site-footer {
            p { (site.name) " · " (site.tagline) }
        }
    }
}

fn section_header(title: &str, subtitle: Option<&str>) -> Markup {
    html! {
        header.section-header {
            h2 { (title) }
            @if let Some(subtitle) = subtitle {
                p.section-subtitle { (subtitle) }
            }
        }
    }
}

/// Wraps page content in header and footer and the document shell.
fn layout(
    site: &SiteInfo,
    section: Option<&str>,
    current_path: &str,
    logo: Option<&ImageRef>,
    body_class: Option<&str>,
    main: Markup,
) -> Markup {
    let content = html! {
        (site_header(site, current_path, logo))
        (main)
        (site_footer(site))
    };
    base_document(&page_title(site, section), body_class, content)
}

fn markdown(text: &str) -> Markup {
    let parser = Parser::new(text);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

// ============================================================================
// Links
// ============================================================================

/// `path` plus form-encoded query pairs, leaving out empty values.
fn href_with_query(path: &str, params: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
        query.append_pair(name, value);
    }
    match query.finish() {
        q if q.is_empty() => path.to_string(),
        q => format!("{path}?{q}"),
    }
}

/// `/portfolio` with the active filter and reveal page, omitting defaults.
pub fn portfolio_href(category: Option<&str>, page: usize) -> String {
    let page = if page > 0 { page.to_string() } else { String::new() };
    href_with_query(
        "/portfolio",
        &[("category", category.unwrap_or("")), ("page", page.as_str())],
    )
}

pub fn lightbox_href(index: usize, category: Option<&str>) -> String {
    href_with_query(
        &format!("/portfolio/view/{index}"),
        &[("category", category.unwrap_or(""))],
    )
}

fn videos_href(platform: Option<&Platform>) -> String {
    href_with_query("/videos", &[("platform", platform.map_or("", Platform::as_tag))])
}

/// `wa.me` chat link with the digits of `number` and a prefilled message.
pub fn whatsapp_href(number: &str, message: Option<&str>) -> Option<String> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let text = message.unwrap_or(DEFAULT_WHATSAPP_MESSAGE);
    Url::parse_with_params(&format!("https://wa.me/{digits}"), &[("text", text)])
        .ok()
        .map(String::from)
}

fn instagram_href(handle: &str) -> String {
    format!("https://instagram.com/{}", handle.trim_start_matches('@'))
}

// ============================================================================
// Media components
// ============================================================================

fn media_alt(item: &MediaItem) -> &str {
    item.caption
        .as_deref()
        .or(item.title.as_deref())
        .unwrap_or("Portfolio image")
}

fn bento_cell(cell: &BentoGridItem<'_>, href: &str) -> Markup {
    let size = match cell.size {
        BentoSize::Small => "small",
        BentoSize::Large => "large",
        BentoSize::Wide => "wide",
    };
    let span = format!(
        "grid-column: span {}; grid-row: span {};",
        cell.col_span, cell.row_span
    );
    html! {
        a class={ "bento-cell bento-" (size) " " (cell.aspect.css_class()) } style=(span) href=(href) {
            img src=(cell.item.display_thumbnail()) alt=(media_alt(cell.item)) loading="lazy";
            @if let Some(caption) = &cell.item.caption {
                span.bento-caption { (caption) }
            }
        }
    }
}

/// A portfolio grid tile. Tiles are uniform so the grid keeps list order.
fn portfolio_tile(item: &MediaItem, href: &str) -> Markup {
    html! {
        a.portfolio-tile href=(href) {
            img src=(item.display_thumbnail()) alt=(media_alt(item)) loading="lazy";
            @if let Some(caption) = &item.caption {
                span.bento-caption { (caption) }
            }
        }
    }
}

fn collage_card(image: &CollageImage, label: &str, href: &str, description: Option<&str>) -> Markup {
    html! {
        a.category-card href=(href) {
            @if image.src.is_empty() {
                div.card-placeholder role="img" aria-label=(image.alt) {}
            } @else {
                img src=(image.src) alt=(image.alt) loading="lazy";
            }
            span.card-label { (label) }
            @if let Some(description) = description {
                span.card-description { (description) }
            }
        }
    }
}

/// A video tile: embedded player when the URL yields an id, thumbnail link
/// otherwise.
fn video_card(video: &MediaItem) -> Markup {
    let embed = match video.platform {
        Platform::YouTube => thumbnails::youtube_video_id(&video.src)
            .map(|id| format!("https://www.youtube.com/embed/{id}")),
        Platform::Instagram => thumbnails::instagram_post_id(&video.src)
            .map(|id| format!("https://www.instagram.com/reel/{id}/embed")),
        Platform::Other(_) => None,
    };
    let title = video.title.as_deref().unwrap_or(media_alt(video));
    html! {
        figure.video-card data-platform=(video.platform.as_tag()) {
            @if let Some(embed) = embed {
                iframe src=(embed) title=(title) loading="lazy" allowfullscreen {}
            } @else {
                a href=(video.src) target="_blank" rel="noopener" {
                    @if let Some(thumbnail) = &video.thumbnail {
                        img src=(thumbnail) alt=(title) loading="lazy";
                    } @else {
                        span.video-placeholder { "Watch on " (video.platform.label()) }
                    }
                }
            }
            @if let Some(caption) = &video.caption {
                figcaption { (caption) }
            }
        }
    }
}

fn video_sections(buckets: &PlatformBuckets<'_>) -> Markup {
    html! {
        @if !buckets.primary.is_empty() {
            section.reels {
                (section_header("Reels", None))
                div.reel-strip {
                    @for video in &buckets.primary {
                        (video_card(video))
                    }
                }
            }
        }
        @if !buckets.secondary.is_empty() {
            section.long-form {
                (section_header("Films", None))
                div.video-grid {
                    @for video in &buckets.secondary {
                        (video_card(video))
                    }
                }
            }
        }
    }
}

fn testimonial_card(testimonial: &Testimonial) -> Markup {
    html! {
        blockquote.testimonial {
            p { (testimonial.quote) }
            footer {
                @if let Some(picture) = &testimonial.author_picture {
                    img.avatar src=(picture) alt=(testimonial.author_name) loading="lazy";
                }
                cite { (testimonial.author_name) }
                @if let Some(event) = &testimonial.event {
                    span.event { (event) }
                }
                @if let Some(platform) = &testimonial.platform {
                    span.via { "via " (platform.label()) }
                }
            }
        }
    }
}

fn contact_actions(contact: &Contact) -> Markup {
    let whatsapp = contact
        .whatsapp_number
        .as_deref()
        .and_then(|n| whatsapp_href(n, contact.whatsapp_message.as_deref()));
    html! {
        ul.contact-actions {
            @if let Some(href) = whatsapp {
                li { a.whatsapp href=(href) target="_blank" rel="noopener" { "WhatsApp" } }
            }
            @if let Some(phone) = &contact.phone_number {
                li { a href={ "tel:" (phone) } { (phone) } }
            }
            @if let Some(email) = &contact.email {
                li { a href={ "mailto:" (email) } { (email) } }
            }
            @if let Some(handle) = &contact.instagram_handle {
                li { a href=(instagram_href(handle)) target="_blank" rel="noopener" { "Instagram" } }
            }
            @if let Some(url) = &contact.facebook_url {
                li { a href=(url) target="_blank" rel="noopener" { "Facebook" } }
            }
            @if let Some(url) = &contact.youtube_channel_url {
                li { a href=(url) target="_blank" rel="noopener" { "YouTube" } }
            }
        }
    }
}

fn contact_section(contact: &Contact) -> Markup {
    html! {
        section.contact id="contact" {
            (section_header(
                contact.contact_title.as_deref().unwrap_or("Get in touch"),
                contact.contact_subtitle.as_deref(),
            ))
            (contact_actions(contact))
            @if contact.show_booking_form {
                (booking_form())
            }
        }
    }
}

/// Booking enquiry; submits to WhatsApp client-side, falls back to the
/// contact links above.
fn booking_form() -> Markup {
    html! {
        form.booking-form data-booking="" {
            label { "Name" input type="text" name="name" required; }
            label { "Event date" input type="date" name="date"; }
            label { "Event" input type="text" name="event" placeholder="Wedding, engagement, party"; }
            label { "Message" textarea name="message" rows="4" {} }
            button type="submit" { "Send enquiry" }
        }
    }
}

fn about_body(about: &About) -> Markup {
    html! {
        @if let Some(image) = &about.image {
            img.about-portrait src=(image.url) alt=(image.alt.as_deref().unwrap_or("Portrait")) loading="lazy";
        }
        div.about-text {
            @if let Some(name) = &about.name {
                h2 { (name) }
            }
            @if let Some(bio) = &about.bio {
                div.bio { (markdown(bio)) }
            }
            @if !about.expertise.is_empty() {
                ul.expertise {
                    @for skill in &about.expertise {
                        li { (skill) }
                    }
                }
            }
        }
    }
}

fn hero_section(hero: &Hero, site: &SiteInfo) -> Markup {
    let background = hero
        .background_image
        .as_ref()
        .map(|image| format!("background-image: url('{}');", image.url));
    html! {
        section.hero style=[background] {
            @if !hero.hero_images.is_empty() {
                div.hero-carousel
                    data-autoplay=(if hero.carousel_auto_play { "true" } else { "false" })
                    data-interval=(hero.carousel_interval_secs * 1000) {
                    @for (i, image) in hero.hero_images.iter().enumerate() {
                        img.slide.active[i == 0]
                            src=(image.url)
                            alt=(image.alt.as_deref().unwrap_or(&site.name))
                            loading=(if i == 0 { "eager" } else { "lazy" });
                    }
                }
            }
            div.hero-text {
                h1 { (hero.title.as_deref().unwrap_or(&site.name)) }
                @if let Some(subtitle) = &hero.subtitle {
                    p.subtitle { (subtitle) }
                }
                @if let Some(location) = &hero.location {
                    p.location { (location) }
                }
            }
            @if hero.show_scroll_cue {
                a.scroll-cue href="#portfolio" aria-label="Scroll to portfolio" { "↓" }
            }
        }
    }
}

fn editorial_card(project: &EditorialProject) -> Markup {
    html! {
        article.editorial-card {
            @if let Some(image) = &project.image {
                img src=(image.url) alt=(image.alt.as_deref().unwrap_or(&project.title)) loading="lazy";
            }
            h3 { (project.title) }
            @if let Some(date) = project.date {
                time datetime=(date.format("%Y-%m-%d").to_string()) { (date.format("%B %Y").to_string()) }
            }
            @if let Some(description) = &project.description {
                p { (description) }
            }
            @if let Some(link) = &project.gallery_link {
                a.gallery-link href=(link) target="_blank" rel="noopener" { (project.gallery_link_text) }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page
pub fn render_home(site: &SiteInfo, page: &HomePage) -> Markup {
    let logo = page.hero.as_ref().and_then(|h| h.logo.as_ref());
    let featured = assign_sizes(&page.featured);
    let videos = partition_by_platform(&page.videos);

    let main = html! {
        main.home-page {
            @if let Some(hero) = &page.hero {
                (hero_section(hero, site))
            }
            section.categories id="portfolio" {
                (section_header("Portfolio", None))
                div.category-carousel {
                    (collage_card(&page.all_card.template_image, &page.all_card.label, &page.all_card.href, None))
                    @for card in &page.category_cards {
                        (collage_card(&card.template_image, &card.category_label, &card.href, card.description.as_deref()))
                    }
                }
            }
            @if !featured.is_empty() {
                section.featured {
                    (section_header("Featured Looks", None))
                    div.bento-grid {
                        @for cell in &featured {
                            (bento_cell(cell, &cell.item.src))
                        }
                    }
                }
            }
            (video_sections(&videos))
            @if !page.testimonials.is_empty() {
                section.testimonials {
                    (section_header("Kind Words", None))
                    div.testimonial-carousel {
                        @for testimonial in &page.testimonials {
                            (testimonial_card(testimonial))
                        }
                    }
                }
            }
            @if let Some(about) = &page.about {
                section.about-teaser {
                    (about_body(about))
                    a.more href="/about" { "More about me" }
                }
            }
            @if let Some(contact) = &page.contact {
                (contact_section(contact))
            }
        }
    };

    layout(site, None, "/", logo, None, main)
}

/// Renders the portfolio grid with its filter bar
pub fn render_portfolio(site: &SiteInfo, page: &PortfolioPage) -> Markup {
    let active = page.active_category.as_deref();
    let visible = page.reveal.visible();
    let section = page
        .categories
        .iter()
        .find(|c| Some(c.id.as_str()) == active)
        .map(|c| c.label.as_str());

    let main = html! {
        main.portfolio-page {
            h1 { (section.unwrap_or("Portfolio")) }
            nav.category-filter {
                a.active[active.is_none()] href="/portfolio" { "All" }
                @for category in &page.categories {
                    a.active[active == Some(category.id.as_str())]
                        href=(portfolio_href(Some(&category.id), 0)) { (category.label) }
                }
            }
            @if visible.is_empty() {
                p.empty { "No looks in this category yet." }
            } @else {
                div.portfolio-grid {
                    @for (index, item) in visible.iter().enumerate() {
                        (portfolio_tile(item, &lightbox_href(index, active)))
                    }
                }
            }
            @if page.reveal.has_more() {
                a.load-more href=(portfolio_href(active, page.page + 1)) {
                    "Load more (" (visible.len()) " of " (page.reveal.total()) ")"
                }
            }
        }
    };

    layout(site, section.or(Some("Portfolio")), "/portfolio", page.logo.as_ref(), None, main)
}

/// Renders the single-item lightbox view
pub fn render_lightbox(site: &SiteInfo, page: &LightboxPage) -> Markup {
    let nav = &page.navigator;
    let item = nav.current();
    let active = page.active_category.as_deref();
    let prev_url = lightbox_href(nav.peek_previous_index(), active);
    let next_url = lightbox_href(nav.peek_next_index(), active);
    let close_url = portfolio_href(active, 0);
    let counter = format!("{} / {}", nav.index() + 1, nav.len());

    let main = html! {
        main.lightbox {
            a.close href=(close_url) aria-label="Close" { "×" }
            figure.lightbox-frame {
                @match item.kind {
                    MediaType::Image => {
                        img src=(item.src) alt=(media_alt(item));
                    }
                    MediaType::Video => {
                        (video_card(item))
                    }
                }
                @if let Some(caption) = &item.caption {
                    figcaption { (caption) }
                }
            }
            nav.lightbox-nav {
                a.prev href=(prev_url) rel="prev" aria-label="Previous" { "‹" }
                span.counter { (counter) }
                a.next href=(next_url) rel="next" aria-label="Next" { "›" }
            }
        }
        div.nav-zones data-prev=(prev_url) data-next=(next_url) data-close=(close_url) {}
    };

    layout(site, Some(media_alt(item)), "/portfolio", None, Some("lightbox-view"), main)
}

pub fn render_videos(site: &SiteInfo, page: &VideosPage) -> Markup {
    let buckets = partition_by_platform(&page.videos);
    let active = page.platform.as_ref();
    let filters = [None, Some(Platform::Instagram), Some(Platform::YouTube)];
    let main = html! {
        main.videos-page {
            h1 { "Videos" }
            @if active.is_some() || !buckets.is_empty() {
                nav.platform-filter {
                    @for filter in &filters {
                        a.active[filter.as_ref() == active] href=(videos_href(filter.as_ref())) {
                            (filter.as_ref().map_or("All", Platform::label))
                        }
                    }
                }
            }
            @if buckets.is_empty() {
                p.empty { "No videos yet." }
            }
            (video_sections(&buckets))
        }
    };
    layout(site, Some("Videos"), "/videos", page.logo.as_ref(), None, main)
}

pub fn render_about(site: &SiteInfo, page: &AboutPage) -> Markup {
    let main = html! {
        main.about-page {
            h1 { "About" }
            @if let Some(about) = &page.about {
                article.about-content { (about_body(about)) }
            } @else {
                p.empty { "Coming soon." }
            }
            @if let Some(contact) = &page.contact {
                (contact_section(contact))
            }
        }
    };
    layout(site, Some("About"), "/about", page.logo.as_ref(), None, main)
}

pub fn render_contact(site: &SiteInfo, page: &ContactPage) -> Markup {
    let fallback = Contact::default();
    let contact = page.contact.as_ref().unwrap_or(&fallback);
    let main = html! {
        main.contact-page {
            (contact_section(contact))
            section.location-share {
                (section_header("Where is your event?", Some("Share your location for a travel estimate.")))
                button type="button" data-share-location="/api/location/share" { "Share my location" }
            }
        }
    };
    layout(site, Some("Contact"), "/contact", page.logo.as_ref(), None, main)
}

pub fn render_editorial(site: &SiteInfo, page: &EditorialPage) -> Markup {
    let main = html! {
        main.editorial-page {
            h1 { "Editorial" }
            @if page.projects.is_empty() {
                p.empty { "No editorial work published yet." }
            } @else {
                div.editorial-grid {
                    @for project in &page.projects {
                        (editorial_card(project))
                    }
                }
            }
        }
    };
    layout(site, Some("Editorial"), "/editorial", page.logo.as_ref(), None, main)
}

pub fn render_not_found(site: &SiteInfo, path: &str) -> Markup {
    let main = html! {
        main.status-page {
            h1 { "Page not found" }
            p { "Nothing lives at " code { (path) } "." }
            a href="/" { "Back home" }
        }
    };
    layout(site, Some("Not found"), path, None, Some("status"), main)
}

/// Generic error boundary page. Never shows error details.
pub fn render_error(site: &SiteInfo) -> Markup {
    let main = html! {
        main.status-page {
            h1 { "Something went wrong" }
            p { "This page could not be loaded right now. Please try again shortly." }
            a href="/" { "Back home" }
        }
    };
    layout(site, Some("Error"), "", None, Some("status"), main)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::IndexNavigator;
    use crate::pages::Degraded;
    use crate::reveal::Reveal;
    use crate::test_helpers::*;
    use crate::types::AllCard;

    fn site() -> SiteInfo {
        SiteInfo::default()
    }

    fn home_page() -> HomePage {
        HomePage {
            hero: None,
            all_card: crate::cards::all_card(&[]),
            category_cards: Vec::new(),
            featured: Vec::new(),
            videos: Vec::new(),
            testimonials: Vec::new(),
            about: None,
            contact: None,
            degraded: Degraded::default(),
        }
    }

    fn portfolio_page(n: usize, active: Option<&str>) -> PortfolioPage {
        let items: Vec<MediaItem> = (0..n).map(|i| image(&format!("m{i}"))).collect();
        PortfolioPage {
            categories: vec![category("bridal", "Bridal")],
            active_category: active.map(str::to_string),
            reveal: Reveal::init(items, 2),
            page: 0,
            logo: None,
            degraded: Degraded::default(),
        }
    }

    /// Tile hrefs in document order.
    fn tile_links(html: &str) -> Vec<String> {
        html.split(r#"<a class="portfolio-tile" href=""#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    // =========================================================================
    // Shell and navigation
    // =========================================================================

    #[test]
    fn base_document_includes_doctype() {
        let html = base_document("Test", None, html! { p { "body" } }).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test</title>"));
    }

    #[test]
    fn nav_marks_current_section() {
        let html = render_nav("/portfolio/view/3").into_string();
        assert!(html.contains(r#"<li class="current"><a href="/portfolio">"#));
        assert!(!html.contains(r#"<li class="current"><a href="/">"#));
    }

    #[test]
    fn nav_home_only_current_on_root() {
        assert!(is_current("/", "/"));
        assert!(!is_current("/", "/videos"));
        assert!(is_current("/videos", "/videos"));
        assert!(!is_current("/video", "/videos"));
    }

    #[test]
    fn html_escape_in_maud() {
        let mut page = home_page();
        page.all_card = AllCard {
            label: "<script>alert(1)</script>".into(),
            ..crate::cards::all_card(&[])
        };
        let html = render_home(&site(), &page).into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    // =========================================================================
    // Links
    // =========================================================================

    #[test]
    fn portfolio_href_omits_defaults() {
        assert_eq!(portfolio_href(None, 0), "/portfolio");
        assert_eq!(portfolio_href(Some("bridal"), 0), "/portfolio?category=bridal");
        assert_eq!(portfolio_href(None, 2), "/portfolio?page=2");
        assert_eq!(
            portfolio_href(Some("party"), 1),
            "/portfolio?category=party&page=1"
        );
    }

    #[test]
    fn hrefs_encode_category_ids() {
        assert_eq!(
            portfolio_href(Some("bridal & party"), 1),
            "/portfolio?category=bridal+%26+party&page=1"
        );
        assert_eq!(
            lightbox_href(3, Some("a?b=c")),
            "/portfolio/view/3?category=a%3Fb%3Dc"
        );
        assert_eq!(lightbox_href(0, None), "/portfolio/view/0");
        assert_eq!(videos_href(None), "/videos");
        assert_eq!(videos_href(Some(&Platform::YouTube)), "/videos?platform=youtube");
    }

    #[test]
    fn whatsapp_href_strips_non_digits_and_encodes() {
        let href = whatsapp_href("+91 98765-43210", Some("Hi there & hello")).unwrap();
        assert!(href.starts_with("https://wa.me/919876543210?text="));
        assert!(!href.contains(' '));
        assert!(href.contains("%26"));
        assert!(whatsapp_href("n/a", None).is_none());
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn home_renders_placeholder_cards() {
        let mut page = home_page();
        page.category_cards = crate::cards::category_cards(&[category("mehendi", "Mehendi")], &[]);
        let html = render_home(&site(), &page).into_string();
        assert!(html.contains(r#"aria-label="Mehendi placeholder""#));
        assert!(html.contains(r#"href="/portfolio?category=mehendi""#));
    }

    #[test]
    fn home_skips_empty_sections() {
        let html = render_home(&site(), &home_page()).into_string();
        assert!(!html.contains("Featured Looks"));
        assert!(!html.contains("Kind Words"));
        assert!(!html.contains("class=\"reels\""));
    }

    #[test]
    fn home_splits_video_sections() {
        let mut page = home_page();
        page.videos = vec![
            video("yt", Platform::YouTube),
            video("ig", Platform::Instagram),
        ];
        let html = render_home(&site(), &page).into_string();
        assert!(html.contains("Reels"));
        assert!(html.contains("Films"));
    }

    #[test]
    fn portfolio_has_load_more_until_exhausted() {
        let html = render_portfolio(&site(), &portfolio_page(5, Some("bridal"))).into_string();
        assert!(html.contains(r#"href="/portfolio?category=bridal&amp;page=1""#));
        assert!(html.contains("Load more (2 of 5)"));
        assert!(html.contains(r#"href="/portfolio/view/0?category=bridal""#));

        let html = render_portfolio(&site(), &portfolio_page(2, None)).into_string();
        assert!(!html.contains(r#"class="load-more""#));
    }

    #[test]
    fn load_more_keeps_earlier_tiles_in_place() {
        let items: Vec<MediaItem> = (0..25)
            .map(|i| {
                let item = image(&format!("m{i:02}")).with_order(i as f64);
                if i == 22 { item.featured() } else { item }
            })
            .collect();
        let mut reveal = Reveal::init(items, 20);
        let first = PortfolioPage {
            reveal: reveal.clone(),
            ..portfolio_page(0, None)
        };
        let before = tile_links(&render_portfolio(&site(), &first).into_string());

        reveal.load_more(20);
        let second = PortfolioPage {
            reveal,
            page: 1,
            ..portfolio_page(0, None)
        };
        let after = tile_links(&render_portfolio(&site(), &second).into_string());

        assert_eq!(before.len(), 20);
        assert_eq!(after.len(), 25);
        assert_eq!(&after[..20], &before[..]);
        assert_eq!(after[0], "/portfolio/view/0");
        assert_eq!(after[22], "/portfolio/view/22");
    }

    #[test]
    fn portfolio_marks_active_filter() {
        let html = render_portfolio(&site(), &portfolio_page(1, Some("bridal"))).into_string();
        assert!(html.contains(r#"<a class="active" href="/portfolio?category=bridal">Bridal</a>"#));
        assert!(html.contains("<h1>Bridal</h1>"));
    }

    #[test]
    fn lightbox_links_wrap() {
        let items = vec![image("a"), image("b"), image("c")];
        let page = LightboxPage {
            active_category: None,
            navigator: IndexNavigator::new(items, 0).unwrap(),
        };
        let html = render_lightbox(&site(), &page).into_string();
        assert!(html.contains(r#"data-prev="/portfolio/view/2""#));
        assert!(html.contains(r#"data-next="/portfolio/view/1""#));
        assert!(html.contains("1 / 3"));
        assert!(html.contains("lightbox-view"));
    }

    #[test]
    fn about_bio_renders_markdown() {
        let page = AboutPage {
            about: Some(About {
                name: Some("Pooja".into()),
                image: None,
                bio: Some("Makeup for *every* celebration".into()),
                expertise: vec!["Bridal".into()],
            }),
            contact: None,
            logo: None,
            degraded: Degraded::default(),
        };
        let html = render_about(&site(), &page).into_string();
        assert!(html.contains("<em>every</em>"));
        assert!(html.contains("<li>Bridal</li>"));
    }

    #[test]
    fn editorial_uses_link_text() {
        let page = EditorialPage {
            projects: vec![EditorialProject {
                id: "e1".into(),
                title: "Vogue Wedding".into(),
                date: chrono::NaiveDate::from_ymd_opt(2024, 2, 14),
                description: None,
                image: None,
                gallery_link: Some("https://gallery.example/vogue".into()),
                gallery_link_text: "View Album".into(),
                order: 0.0,
            }],
            logo: Some(ImageRef {
                url: "https://cdn.example/logo.png".into(),
                alt: None,
            }),
            degraded: Degraded::default(),
        };
        let html = render_editorial(&site(), &page).into_string();
        assert!(html.contains("View Album"));
        assert!(html.contains("February 2024"));
        assert!(html.contains(r#"src="https://cdn.example/logo.png""#));
    }

    #[test]
    fn videos_filter_bar_marks_platform() {
        let page = VideosPage {
            platform: Some(Platform::YouTube),
            videos: vec![video("yt", Platform::YouTube)],
            logo: None,
            degraded: Degraded::default(),
        };
        let html = render_videos(&site(), &page).into_string();
        assert!(html.contains(r#"href="/videos">All</a>"#));
        assert!(html.contains(r#"<a class="active" href="/videos?platform=youtube">YouTube</a>"#));

        let empty = VideosPage {
            platform: None,
            videos: Vec::new(),
            logo: None,
            degraded: Degraded::default(),
        };
        let html = render_videos(&site(), &empty).into_string();
        assert!(!html.contains("platform-filter"));
        assert!(html.contains("No videos yet."));
    }

    #[test]
    fn error_page_is_generic() {
        let html = render_error(&site()).into_string();
        assert!(html.contains("Something went wrong"));
    }
}
