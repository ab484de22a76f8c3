//! Fixed-window rate limiting for the public write endpoint.
//!
//! Each client key gets a window that opens on its first request and lasts
//! `window`. Up to `max_requests` are admitted inside it; the first request
//! after the window closes opens a fresh one with a count of 1.

use crate::config::RateLimitConfig;
use axum::http::HeaderMap;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Admission control keyed by client.
pub trait RateLimiter: Send + Sync {
    /// Count one request against `key`. False when the key is over its limit.
    fn try_acquire(&self, key: &str) -> bool;
}

/// Expired windows are swept once the map grows past this many keys.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: Instant,
}

/// Process-local limiter. State is lost on restart and not shared between
/// instances.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// [`RateLimiter::try_acquire`] against an explicit clock.
    pub fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, w| now <= w.resets_at);
        }
        match windows.get_mut(key) {
            Some(w) if now <= w.resets_at => {
                if w.count >= self.max_requests {
                    return false;
                }
                w.count += 1;
                true
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        resets_at: now + self.window,
                    },
                );
                true
            }
        }
    }

    /// Number of tracked client keys.
    pub fn tracked(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Instant::now())
    }
}

/// The client key: first `x-forwarded-for` entry, else `x-real-ip`, else
/// `"unknown"`.
pub fn client_key(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .or_else(|| header("x-real-ip"))
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limiter() -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(5, Duration::from_secs(60))
    }

    // =========================================================================
    // Window accounting
    // =========================================================================

    #[test]
    fn sixth_request_in_window_is_rejected() {
        let limiter = limiter();
        let start = Instant::now();
        for i in 0..5 {
            assert!(limiter.try_acquire_at("1.2.3.4", start + Duration::from_secs(i)));
        }
        assert!(!limiter.try_acquire_at("1.2.3.4", start + Duration::from_secs(10)));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = limiter();
        let start = Instant::now();
        for _ in 0..5 {
            assert!(limiter.try_acquire_at("k", start));
        }
        assert!(!limiter.try_acquire_at("k", start + Duration::from_secs(60)));
        assert!(limiter.try_acquire_at("k", start + Duration::from_secs(61)));
        // The new window counts from 1.
        for _ in 0..4 {
            assert!(limiter.try_acquire_at("k", start + Duration::from_secs(62)));
        }
        assert!(!limiter.try_acquire_at("k", start + Duration::from_secs(63)));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = InMemoryRateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.try_acquire_at("a", now));
        assert!(!limiter.try_acquire_at("a", now));
        assert!(limiter.try_acquire_at("b", now));
        assert_eq!(limiter.tracked(), 2);
    }

    #[test]
    fn from_config_uses_limits() {
        let limiter = InMemoryRateLimiter::from_config(&RateLimitConfig {
            max_requests: 2,
            window_secs: 1,
        });
        assert!(limiter.try_acquire("x"));
        assert!(limiter.try_acquire("x"));
        assert!(!limiter.try_acquire("x"));
    }

    #[test]
    fn expired_windows_are_pruned() {
        let limiter = InMemoryRateLimiter::new(5, Duration::from_secs(1));
        let start = Instant::now();
        for i in 0..PRUNE_THRESHOLD {
            limiter.try_acquire_at(&format!("client-{i}"), start);
        }
        limiter.try_acquire_at("late", start + Duration::from_secs(5));
        assert_eq!(limiter.tracked(), 1);
    }

    // =========================================================================
    // Client key
    // =========================================================================

    #[test]
    fn client_key_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.9.9.9"));
        assert_eq!(client_key(&headers), "10.0.0.1");
    }

    #[test]
    fn client_key_falls_back() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers), "unknown");
        headers.insert("x-real-ip", HeaderValue::from_static("10.9.9.9"));
        assert_eq!(client_key(&headers), "10.9.9.9");
    }
}
