//! # Bridal Folio
//!
//! A server-rendered portfolio site for a bridal makeup and mehendi studio.
//! Content lives in a headless store; every page is assembled on request
//! from a handful of queries, rendered with Maud, and cached until the
//! store reports a change.
//!
//! # Architecture: Fetch, Derive, Render
//!
//! ```text
//! 1. Fetch    store records  →  typed entities   (source adapter)
//! 2. Derive   entities       →  view models      (cards, batches, bento sizes)
//! 3. Render   view models    →  HTML             (Maud, cached per URL)
//! ```
//!
//! The derive stage is a set of pure functions over borrowed slices. Nothing
//! in it does I/O, so the rules that decide what a visitor sees (which image
//! fronts a category card, how large each grid cell is, which videos are
//! reels) are tested without a server or a store.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Content store backends and the adapter that normalises records into [`types`] |
//! | [`types`] | Shared entities: media items, categories, cards, singletons |
//! | [`thumbnails`] | Video thumbnail fallback (YouTube id extraction) |
//! | [`select`] | Representative image selection for category and "All" cards |
//! | [`cards`] | Category card and "All" card builders |
//! | [`filter`] | Category filter for the portfolio grid |
//! | [`reveal`] | Progressive "load more" window over a list |
//! | [`bento`] | Bento grid cell sizing |
//! | [`platform`] | Reels / long-form video split |
//! | [`navigator`] | Wrap-around lightbox navigation |
//! | [`pages`] | Per-page assembly with critical and degraded sections |
//! | [`render`] | Maud page templates |
//! | [`cache`] | Rendered page cache with ETags and path invalidation |
//! | [`server`] | Axum routes: pages, location share, revalidation |
//! | [`config`] | `config.toml` loading, validation, merging; secrets from the environment |
//! | [`output`] | CLI output formatting for `check` |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a build error, template variables are Rust expressions, and all
//! interpolation is escaped. There is no template directory to ship.
//!
//! ## Render Once, Invalidate on Change
//!
//! The store changes a few times a week and is read on every page view.
//! Rendered pages are cached in memory keyed by path and query; the store's
//! webhook hits `/api/revalidate` with the changed document type, and only
//! the pages that show that type are dropped.
//!
//! ## Missing Data Is Not an Error
//!
//! A studio with no testimonials yet still has a home page. Each page names
//! the collections it cannot do without; every other section renders empty
//! when its query fails. See [`pages`].
//!
//! ## Swappable Store
//!
//! The adapter talks to a [`source::ContentStore`] trait object. Production
//! uses the hosted store's HTTP query API; development and tests use a
//! directory of exported records with the same shape. Switching is one
//! line in `config.toml`.

pub mod bento;
pub mod cache;
pub mod cards;
pub mod config;
pub mod filter;
pub mod navigator;
pub mod output;
pub mod pages;
pub mod platform;
pub mod render;
pub mod reveal;
pub mod select;
pub mod server;
pub mod source;
pub mod thumbnails;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
