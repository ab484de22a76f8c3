//! Rendered-page cache with content-hash ETags.
//!
//! Rendering a page means several store round-trips, while the content behind
//! it changes only when an editor publishes. Rendered HTML is therefore
//! cached until the revalidation endpoint says otherwise.
//!
//! # Design
//!
//! ## Cache keys
//!
//! Entries are keyed by request path plus the query parameters the page
//! actually reads (`/portfolio?category=bridal`), re-encoded in a fixed
//! order. Parameters a page ignores never reach the key, so `?utm=x` and
//! `?junk=1` share the entry of the bare path. Invalidation works on the
//! **path** alone: invalidating `/portfolio` drops every category and page
//! variant of it, along with every page below it (`/portfolio/view/3`).
//!
//! ## Capacity
//!
//! The cache holds at most `server.cache_pages` entries. Inserting past that
//! evicts the least recently served page.
//!
//! ## ETags
//!
//! Each entry's ETag is the SHA-256 of its body. Content-based rather than
//! time-based, so re-rendering unchanged content after a revalidation yields
//! the same ETag and browsers keep getting `304 Not Modified`.
//!
//! ## What is never cached
//!
//! Error pages, and pages rendered while one of their sections failed to
//! load. Both are served fresh on every request so a store outage doesn't
//! outlive its cause.

use lru::LruCache;
use sha2::{Digest, Sha256};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::form_urlencoded;

/// A rendered page and its validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
    pub body: String,
    pub etag: String,
}

impl CachedPage {
    pub fn new(body: String) -> Self {
        let etag = etag_for(&body);
        Self { body, etag }
    }

    /// True when an `If-None-Match` header value names this page's ETag.
    pub fn matches(&self, if_none_match: &str) -> bool {
        if_none_match.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.trim_start_matches("W/") == self.etag
        })
    }
}

/// Strong ETag (quoted hex SHA-256) for a response body.
pub fn etag_for(body: &str) -> String {
    format!("\"{:x}\"", Sha256::digest(body.as_bytes()))
}

/// Build a cache key from a path and the query parameters that shape the
/// page. Pairs with an empty value are left out.
pub fn cache_key(path: &str, params: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
        query.append_pair(name, value);
    }
    match query.finish() {
        q if q.is_empty() => path.to_string(),
        q => format!("{path}?{q}"),
    }
}

fn key_path(key: &str) -> &str {
    key.split_once('?').map_or(key, |(path, _)| path)
}

/// Process-wide cache of rendered pages.
pub struct PageCache {
    entries: Mutex<LruCache<String, Arc<CachedPage>>>,
    stats: Mutex<CacheStats>,
}

impl PageCache {
    /// A cache holding at most `capacity` pages (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<String, Arc<CachedPage>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stats_mut(&self) -> MutexGuard<'_, CacheStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Arc<CachedPage>> {
        let found = self.entries().get(key).cloned();
        let mut stats = self.stats_mut();
        match found {
            Some(_) => stats.hit(),
            None => stats.miss(),
        }
        found
    }

    /// Store a freshly rendered page and return the cached entry.
    pub fn insert(&self, key: String, body: String) -> Arc<CachedPage> {
        let page = Arc::new(CachedPage::new(body));
        let pushed = self.entries().push(key.clone(), page.clone());
        if pushed.is_some_and(|(old_key, _)| old_key != key) {
            self.stats_mut().evicted();
        }
        page
    }

    /// Drop every entry whose path is `path` or lies below it.
    /// Returns the number of entries removed.
    pub fn invalidate(&self, path: &str) -> usize {
        let nested = format!("{}/", path.trim_end_matches('/'));
        let mut entries = self.entries();
        let doomed: Vec<String> = entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| {
                let entry_path = key_path(key);
                entry_path == path || (path != "/" && entry_path.starts_with(&nested))
            })
            .cloned()
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        drop(entries);
        self.stats_mut().invalidated(doomed.len());
        doomed.len()
    }

    /// Drop everything. Returns the number of entries removed.
    pub fn invalidate_all(&self) -> usize {
        let removed = {
            let mut entries = self.entries();
            let n = entries.len();
            entries.clear();
            n
        };
        self.stats_mut().invalidated(removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats_mut().clone()
    }
}

/// Running totals for the page cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub invalidations: u32,
    pub evictions: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn invalidated(&mut self, entries: usize) {
        self.invalidations += u32::try_from(entries).unwrap_or(u32::MAX);
    }

    pub fn evicted(&mut self) {
        self.evictions += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "no page requests");
        }
        write!(f, "{} cached, {} rendered", self.hits, self.misses)?;
        if self.invalidations > 0 {
            write!(f, ", {} invalidated", self.invalidations)?;
        }
        if self.evictions > 0 {
            write!(f, ", {} evicted", self.evictions)?;
        }
        Ok(())
    }
}
