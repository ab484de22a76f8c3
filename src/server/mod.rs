//! HTTP server.
//!
//! An axum router over the page handlers and the two API endpoints. Pages are
//! rendered through [`crate::pages`] and [`crate::render`] and cached in a
//! [`PageCache`] until the revalidation endpoint invalidates them.
//!
//! ## Routes
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | home |
//! | `GET /portfolio?category&page` | portfolio grid |
//! | `GET /portfolio/view/{index}?category` | lightbox |
//! | `GET /videos?platform` | videos, optionally one platform |
//! | `GET /about`, `/contact`, `/editorial` | secondary pages |
//! | `GET, POST /api/location/share` | [`location`] |
//! | `GET, POST /api/revalidate` | [`revalidate`] |
//!
//! ## Responses
//!
//! Pages carry a content-hash `ETag`; a matching `If-None-Match` gets
//! `304 Not Modified`. A page whose critical content failed to load renders
//! the generic error page with status 500. A page that rendered with a
//! degraded section is served but not cached, so the next request retries
//! the store. API errors are JSON, shaped by [`ServerError`].

pub mod location;
pub mod rate_limit;
pub mod revalidate;

pub use rate_limit::{InMemoryRateLimiter, RateLimiter, client_key};

use crate::cache::{CachedPage, PageCache, cache_key};
use crate::config::{Secrets, SiteConfig};
use crate::pages::{self, Degraded, PageError};
use crate::render;
use crate::source::{ContentSource, ContentStore, DocumentWriter, SourceError};
use crate::types::Platform;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use maud::Markup;
use serde_json::json;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Errors surfaced by the API endpoints.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Validation(String),
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Invalid secret")]
    Unauthorized,
    #[error("{0}")]
    Configuration(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::Configuration(_) | ServerError::Source(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Store failures are not described.
    pub fn message(&self) -> String {
        match self {
            ServerError::Source(_) => "Failed to store location. Please try again later.".into(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            ServerError::Source(e) => error!(error = %e, "content store write failed"),
            ServerError::Configuration(msg) => error!(%msg, "endpoint misconfigured"),
            _ => {}
        }
    }

    /// `{error}` body, without the `success` flag.
    pub fn into_bare_response(self) -> Response {
        self.log();
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.log();
        let body = json!({ "success": false, "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub source: ContentSource,
    pub writer: Option<Arc<dyn DocumentWriter>>,
    pub cache: Arc<PageCache>,
    pub limiter: Arc<dyn RateLimiter>,
    pub config: Arc<SiteConfig>,
    pub secrets: Arc<Secrets>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        writer: Option<Arc<dyn DocumentWriter>>,
        config: SiteConfig,
        secrets: Secrets,
    ) -> Self {
        Self {
            source: ContentSource::new(store, &config.videos),
            writer,
            cache: Arc::new(PageCache::new(config.server.cache_pages)),
            limiter: Arc::new(InMemoryRateLimiter::from_config(&config.rate_limit)),
            config: Arc::new(config),
            secrets: Arc::new(secrets),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/portfolio", get(portfolio))
        .route("/portfolio/view/:index", get(lightbox))
        .route("/videos", get(videos))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/editorial", get(editorial))
        .route(
            "/api/location/share",
            get(location::describe).post(location::share),
        )
        .route(
            "/api/revalidate",
            get(revalidate::single).post(revalidate::webhook),
        )
        .fallback(not_found)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, bind: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "serving");
    axum::serve(listener, router(state)).await
}

// ============================================================================
// Page plumbing
// ============================================================================

type Params = Query<HashMap<String, String>>;

/// Non-empty `category` query parameter.
fn category_param(params: &HashMap<String, String>) -> Option<&str> {
    params
        .get("category")
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
}

/// `page` query parameter; anything unparseable is the first page.
fn page_param(params: &HashMap<String, String>) -> usize {
    params
        .get("page")
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(0)
}

/// `platform` query parameter: one of the two embeddable platforms, else
/// every platform.
fn platform_param(params: &HashMap<String, String>) -> Option<Platform> {
    match params.get("platform").map(|p| p.trim()) {
        Some("instagram") => Some(Platform::Instagram),
        Some("youtube") => Some(Platform::YouTube),
        _ => None,
    }
}

/// A rendered page and the sections it had to leave out.
type Rendered = (Markup, Degraded);

/// Serve from the cache, or render, cache and serve.
///
/// `render` is only polled on a cache miss. A degraded render is served
/// without being cached.
async fn cached_page(
    state: &AppState,
    key: String,
    uri: &Uri,
    headers: &HeaderMap,
    render: impl Future<Output = Result<Rendered, PageError>>,
) -> Response {
    let page = match state.cache.get(&key) {
        Some(page) => {
            debug!(%key, "page cache hit");
            page
        }
        None => match render.await {
            Ok((markup, degraded)) if degraded.is_empty() => {
                debug!(%key, "page rendered");
                state.cache.insert(key, markup.into_string())
            }
            Ok((markup, degraded)) => {
                warn!(%key, sections = ?degraded.sections(), "serving degraded page uncached");
                Arc::new(CachedPage::new(markup.into_string()))
            }
            Err(PageError::NotFound(what)) => {
                debug!(%key, %what, "not found");
                return not_found_page(state, uri);
            }
            Err(PageError::Source(e)) => {
                error!(path = uri.path(), error = %e, "page failed to load");
                let body = render::render_error(&state.config.site).into_string();
                return (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response();
            }
        },
    };
    respond(&page, headers)
}

fn respond(page: &CachedPage, headers: &HeaderMap) -> Response {
    let fresh = headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| page.matches(v));
    if fresh {
        return (StatusCode::NOT_MODIFIED, [(ETAG, page.etag.clone())]).into_response();
    }
    (
        [
            (ETAG, page.etag.clone()),
            (CACHE_CONTROL, "no-cache".to_string()),
        ],
        Html(page.body.clone()),
    )
        .into_response()
}

fn not_found_page(state: &AppState, uri: &Uri) -> Response {
    let body = render::render_not_found(&state.config.site, uri.path()).into_string();
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

// ============================================================================
// Page handlers
// ============================================================================

async fn home(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let render = async {
        pages::home(&state.source, &state.config.layout)
            .await
            .map(|page| (render::render_home(&state.config.site, &page), page.degraded))
    };
    cached_page(&state, cache_key("/", &[]), &uri, &headers, render).await
}

async fn portfolio(
    State(state): State<AppState>,
    Query(params): Params,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let category = category_param(&params);
    let page = page_param(&params);
    let page_text = if page > 0 { page.to_string() } else { String::new() };
    let key = cache_key(
        "/portfolio",
        &[("category", category.unwrap_or("")), ("page", page_text.as_str())],
    );
    let render = async {
        pages::portfolio(&state.source, &state.config.layout, category, page)
            .await
            .map(|page| (render::render_portfolio(&state.config.site, &page), page.degraded))
    };
    cached_page(&state, key, &uri, &headers, render).await
}

async fn lightbox(
    State(state): State<AppState>,
    Path(index): Path<String>,
    Query(params): Params,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Ok(index) = index.parse::<usize>() else {
        return not_found_page(&state, &uri);
    };
    let category = category_param(&params);
    let key = cache_key(
        &format!("/portfolio/view/{index}"),
        &[("category", category.unwrap_or(""))],
    );
    let render = async {
        pages::lightbox(&state.source, category, index)
            .await
            .map(|page| (render::render_lightbox(&state.config.site, &page), Degraded::default()))
    };
    cached_page(&state, key, &uri, &headers, render).await
}

async fn videos(
    State(state): State<AppState>,
    Query(params): Params,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let platform = platform_param(&params);
    let key = cache_key(
        "/videos",
        &[("platform", platform.as_ref().map_or("", Platform::as_tag))],
    );
    let render = async {
        pages::videos(&state.source, platform.clone())
            .await
            .map(|page| (render::render_videos(&state.config.site, &page), page.degraded))
    };
    cached_page(&state, key, &uri, &headers, render).await
}

async fn about(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let render = async {
        pages::about(&state.source)
            .await
            .map(|page| (render::render_about(&state.config.site, &page), page.degraded))
    };
    cached_page(&state, cache_key("/about", &[]), &uri, &headers, render).await
}

async fn contact(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let render = async {
        pages::contact(&state.source)
            .await
            .map(|page| (render::render_contact(&state.config.site, &page), page.degraded))
    };
    cached_page(&state, cache_key("/contact", &[]), &uri, &headers, render).await
}

async fn editorial(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let render = async {
        pages::editorial(&state.source)
            .await
            .map(|page| (render::render_editorial(&state.config.site, &page), page.degraded))
    };
    cached_page(&state, cache_key("/editorial", &[]), &uri, &headers, render).await
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    not_found_page(&state, &uri)
}
