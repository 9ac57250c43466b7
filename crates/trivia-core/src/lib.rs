use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub mod category;

pub use category::{classify, Category};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("parse failed: {0}")]
    Parse(String),
    #[error("search failed: {0}")]
    Search(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One normalized hit from an upstream: a (title, snippet, url) triple.
///
/// Records are never merged or deduplicated; two sources returning the same
/// title produce two records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SourceRecord {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// Result of one upstream call after failure absorption.
///
/// `Unavailable` carries a short, deterministic reason ("HTTP 503", "timeout")
/// that the formatter surfaces as a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Outcome<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable(r) => Some(r.as_str()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Available(v) => Outcome::Available(f(v)),
            Self::Unavailable(r) => Outcome::Unavailable(r),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Degrade to the empty value: an empty list, three empty lists, `None`.
    pub fn unwrap_or_empty(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(r: Result<T>) -> Self {
        match r {
            Ok(v) => Self::Available(v),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }
}

/// Records from the date-indexed "on this day" feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnThisDay {
    pub events: Vec<SourceRecord>,
    pub births: Vec<SourceRecord>,
    pub deaths: Vec<SourceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    /// Timeout for the whole request (connect + body).
    pub timeout_ms: Option<u64>,
    /// Hard cap on bytes read from the response body.
    pub max_bytes: Option<u64>,
    /// Extra headers (user agent overrides, mostly).
    pub headers: BTreeMap<String, String>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.headers.insert(k.into(), v.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

impl FetchResponse {
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).to_string()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam. The reqwest implementation lives in `trivia-local`; tests
/// substitute an in-memory backend.
#[async_trait::async_trait]
pub trait FetchBackend: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: usize,
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, q: &SearchQuery) -> Result<Vec<SourceRecord>>;
}

/// True for absolute `http://` / `https://` URLs with a host.
pub fn is_http_url(s: &str) -> bool {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    url::Url::parse(s)
        .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_error_keeps_display_reason() {
        let o: Outcome<Vec<SourceRecord>> = Err(Error::Status(503)).into();
        assert_eq!(o.reason(), Some("HTTP 503"));
        assert!(o.unwrap_or_empty().is_empty());
    }

    #[test]
    fn every_error_variant_becomes_a_short_reason() {
        let all = [
            Error::InvalidUrl("bad".into()),
            Error::Fetch("connection refused".into()),
            Error::Status(500),
            Error::Parse("unexpected opensearch shape".into()),
            Error::Search("timeout".into()),
        ];
        for e in all {
            // Exhaustive: each variant has a producer in trivia-local.
            match &e {
                Error::InvalidUrl(_)
                | Error::Fetch(_)
                | Error::Status(_)
                | Error::Parse(_)
                | Error::Search(_) => {}
            }
            let o: Outcome<Vec<SourceRecord>> = Err(e).into();
            let reason = o.reason().unwrap_or_default().to_string();
            assert!(!reason.is_empty() && reason.len() < 60, "{reason}");
            assert!(o.map(|v| v.len()).into_option().is_none());
        }
    }

    #[test]
    fn unavailable_on_this_day_degrades_to_three_empty_lists() {
        let o: Outcome<OnThisDay> = Outcome::Unavailable("timeout".to_string());
        let d = o.unwrap_or_empty();
        assert!(d.events.is_empty() && d.births.is_empty() && d.deaths.is_empty());
    }

    #[test]
    fn is_http_url_requires_scheme_and_host() {
        assert!(is_http_url("https://example.com/a"));
        assert!(is_http_url("HTTP://example.com"));
        assert!(!is_http_url("not-a-url"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn fetch_response_success_range() {
        let mut r = FetchResponse {
            url: "u".into(),
            final_url: "u".into(),
            status: 204,
            content_type: None,
            bytes: Vec::new(),
            truncated: false,
        };
        assert!(r.is_success());
        r.status = 404;
        assert!(!r.is_success());
    }
}
