//! HTTP caching headers for rendered widgets
//!
//! Embedding sites (and GitHub's image proxy) keep images for a long time
//! unless told otherwise, so every response advertises a short max-age. The
//! upstream data behind it is cached separately for an hour.

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{DateTime, TimeDelta, Utc};

/// Lifetime advertised to HTTP caches, in seconds
pub const RESPONSE_MAX_AGE_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHeaders {
    pub cache_control: String,
    pub age: String,
    pub date: String,
    pub last_modified: String,
    pub expires: String,
}

impl CacheHeaders {
    pub fn new(now: DateTime<Utc>, ttl_secs: i64) -> Self {
        let expires = now
            .checked_add_signed(TimeDelta::seconds(ttl_secs))
            .unwrap_or(now);

        Self {
            cache_control: format!("max-age={ttl_secs}, s-maxage={ttl_secs}"),
            age: "0".to_string(),
            date: http_date(now),
            last_modified: http_date(now),
            expires: http_date(expires),
        }
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        let pairs = [
            (header::CACHE_CONTROL, &self.cache_control),
            (header::AGE, &self.age),
            (header::DATE, &self.date),
            (header::LAST_MODIFIED, &self.last_modified),
            (header::EXPIRES, &self.expires),
        ];
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
    }
}

/// Headers for a response generated at `now`
pub fn cache_headers(now: DateTime<Utc>) -> CacheHeaders {
    CacheHeaders::new(now, RESPONSE_MAX_AGE_SECS)
}

/// RFC 7231 IMF-fixdate, e.g. `Mon, 01 Jan 2024 10:05:00 GMT`
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
