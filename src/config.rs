//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table first, then the user's `config.toml` (if any) is
//! merged on top key-by-key, so a config file only needs the values it wants
//! to change.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml          # Site config (optional)
//! └── content/             # Content snapshot (snapshot backend only)
//!     ├── media.json
//!     └── videos.ndjson
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Pooja HennArt & Makeover"
//! tagline = "Bridal makeup & mehendi"
//!
//! [content]
//! backend = "snapshot"       # "snapshot" or "sanity"
//! snapshot_dir = "content"   # Relative to the site root
//! project_id = ""            # Content store project (sanity backend)
//! dataset = "production"
//! api_version = "2024-01-01"
//! use_cdn = true
//! timeout_secs = 10
//!
//! [server]
//! bind = "127.0.0.1:3000"
//! cache_pages = 256         # Rendered pages kept in memory
//!
//! [layout]
//! initial_batch = 20         # Items exposed before the first "load more"
//! load_more_batch = 20       # Items appended per "load more"
//! featured_limit = 12        # Featured looks on the home page
//! testimonials_limit = 6
//!
//! [videos]
//! enabled_platforms = ["youtube"]
//!
//! [rate_limit]
//! max_requests = 5           # Per client, per window
//! window_secs = 60
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Secrets
//!
//! Tokens and shared secrets never live in `config.toml`. They are read from
//! the environment by [`Secrets::from_env`]:
//!
//! | Variable | Used by |
//! |----------|---------|
//! | `REVALIDATE_SECRET` | `/api/revalidate` |
//! | `SANITY_API_READ_TOKEN` | content queries against private datasets |
//! | `SANITY_API_WRITE_TOKEN` | location share write-back |

use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Studio name and tagline shown in the header and page titles.
    pub site: SiteInfo,
    /// Where content comes from.
    pub content: ContentConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Batch sizes and section limits for derived views.
    pub layout: LayoutConfig,
    /// Video platform policy.
    pub videos: VideosConfig,
    /// Write-back rate limiting.
    pub rate_limit: RateLimitConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.initial_batch == 0 {
            return Err(ConfigError::Validation(
                "layout.initial_batch must be at least 1".into(),
            ));
        }
        if self.layout.load_more_batch == 0 {
            return Err(ConfigError::Validation(
                "layout.load_more_batch must be at least 1".into(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.max_requests must be at least 1".into(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.window_secs must be non-zero".into(),
            ));
        }
        if self.server.cache_pages == 0 {
            return Err(ConfigError::Validation(
                "server.cache_pages must be at least 1".into(),
            ));
        }
        if self.content.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "content.timeout_secs must be non-zero".into(),
            ));
        }
        if self.content.backend == ContentBackend::Sanity && self.content.project_id.is_empty() {
            return Err(ConfigError::Validation(
                "content.project_id is required for the sanity backend".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Pooja HennArt & Makeover".to_string(),
            tagline: "Bridal makeup & mehendi".to_string(),
        }
    }
}

/// Which [`ContentStore`](crate::source::ContentStore) backs the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    /// A directory of exported JSON / NDJSON records.
    Snapshot,
    /// The hosted content store's HTTP query API.
    Sanity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub backend: ContentBackend,
    /// Snapshot directory, relative to the site root.
    pub snapshot_dir: String,
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Read through the API CDN. Writes never use the CDN.
    pub use_cdn: bool,
    /// Per-request timeout for store fetches.
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: ContentBackend::Snapshot,
            snapshot_dir: "content".to_string(),
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    /// Rendered pages kept in memory; the least recently used is evicted.
    pub cache_pages: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            cache_pages: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Items exposed by a fresh reveal window.
    pub initial_batch: usize,
    /// Items appended per "load more".
    pub load_more_batch: usize,
    /// Maximum featured looks on the home page.
    pub featured_limit: usize,
    /// Testimonials fetched for the home page.
    pub testimonials_limit: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            initial_batch: 20,
            load_more_batch: 20,
            featured_limit: 12,
            testimonials_limit: 6,
        }
    }
}

/// Video platform policy.
///
/// Platforms missing from `enabled_platforms` are excluded by the adapter even
/// when the store holds records for them. Instagram reels are off until their
/// embeds are supported; flipping the switch needs no code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideosConfig {
    pub enabled_platforms: Vec<String>,
}

impl Default for VideosConfig {
    fn default() -> Self {
        Self {
            enabled_platforms: vec!["youtube".to_string()],
        }
    }
}

impl VideosConfig {
    /// Parsed platform tags, in config order.
    pub fn platforms(&self) -> Vec<Platform> {
        self.enabled_platforms
            .iter()
            .map(|tag| Platform::from_tag(tag))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_secs: 60,
        }
    }
}

/// Secrets read from the environment, never from TOML.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub revalidate_secret: Option<String>,
    pub read_token: Option<String>,
    pub write_token: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            revalidate_secret: non_empty_env("REVALIDATE_SECRET"),
            read_token: non_empty_env("SANITY_API_READ_TOKEN"),
            write_token: non_empty_env("SANITY_API_WRITE_TOKEN"),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bridal-folio configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Secrets are read from the environment, never from this file:
#   REVALIDATE_SECRET       shared secret for /api/revalidate
#   SANITY_API_READ_TOKEN   read token for private datasets
#   SANITY_API_WRITE_TOKEN  write token for location shares

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Pooja HennArt & Makeover"
tagline = "Bridal makeup & mehendi"

# ---------------------------------------------------------------------------
# Content source
# ---------------------------------------------------------------------------
[content]
# "snapshot" reads exported records from snapshot_dir.
# "sanity" queries the hosted content store over HTTP.
backend = "snapshot"
snapshot_dir = "content"
project_id = ""
dataset = "production"
api_version = "2024-01-01"
use_cdn = true
# Per-request timeout, in seconds.
timeout_secs = 10

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:3000"
# Rendered pages kept in memory.
cache_pages = 256

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Items shown before the first "load more", and per "load more".
initial_batch = 20
load_more_batch = 20
# Featured looks on the home page.
featured_limit = 12
# Testimonials on the home page.
testimonials_limit = 6

# ---------------------------------------------------------------------------
# Videos
# ---------------------------------------------------------------------------
[videos]
# Platforms surfaced on the site. Records for other platforms are ignored.
enabled_platforms = ["youtube"]

# ---------------------------------------------------------------------------
# Location share rate limiting
# ---------------------------------------------------------------------------
[rate_limit]
max_requests = 5
window_secs = 60
"##
}
