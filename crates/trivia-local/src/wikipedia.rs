//! Wikipedia REST (`/feed/onthisday`, `/page/summary`) and legacy `api.php`
//! opensearch client.

use crate::extract::clip;
use serde::Deserialize;
use std::sync::Arc;
use trivia_core::{Error, FetchBackend, FetchRequest, OnThisDay, Result, SourceRecord};

/// Cap for page extracts attached to on-this-day entries and search hits.
pub const EXTRACT_MAX_CHARS: usize = 200;
/// Cap for a single article summary.
pub const SUMMARY_MAX_CHARS: usize = 800;

#[derive(Clone)]
pub struct WikipediaClient {
    backend: Arc<dyn FetchBackend>,
    rest_endpoint: String,
    api_endpoint: String,
    timeout_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
struct OnThisDayFeed {
    #[serde(default)]
    events: Vec<FeedEntry>,
    #[serde(default)]
    births: Vec<FeedEntry>,
    #[serde(default)]
    deaths: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(default)]
    text: String,
    #[serde(default)]
    year: Option<i64>,
    #[serde(default)]
    pages: Vec<FeedPage>,
}

#[derive(Debug, Deserialize)]
struct FeedPage {
    #[serde(default)]
    extract: Option<String>,
    /// Flattened shape some mirrors serve.
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    #[serde(default)]
    desktop: Option<PlatformUrls>,
}

#[derive(Debug, Deserialize)]
struct PlatformUrls {
    #[serde(default)]
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

fn desktop_url(c: &Option<ContentUrls>) -> Option<String> {
    c.as_ref()?.desktop.as_ref()?.page.clone()
}

fn format_year(year: i64) -> String {
    if year < 0 {
        format!("{} BC", -year)
    } else {
        year.to_string()
    }
}

impl FeedEntry {
    fn into_record(self) -> SourceRecord {
        let title = match self.year {
            Some(y) => format!("{}: {}", format_year(y), self.text.trim()),
            None => self.text.trim().to_string(),
        };
        let first = self.pages.into_iter().next();
        let snippet = first
            .as_ref()
            .and_then(|p| p.extract.as_deref())
            .map(|e| clip(e, EXTRACT_MAX_CHARS))
            .unwrap_or_default();
        let url = first
            .and_then(|p| p.url.clone().or_else(|| desktop_url(&p.content_urls)))
            .unwrap_or_default();
        SourceRecord {
            title,
            snippet,
            url,
        }
    }
}

/// Parse an on-this-day feed body. Missing arrays read as empty.
pub fn parse_on_this_day(body: &[u8]) -> Result<OnThisDay> {
    let feed: OnThisDayFeed =
        serde_json::from_slice(body).map_err(|e| Error::Parse(e.to_string()))?;
    let conv = |v: Vec<FeedEntry>| -> Vec<SourceRecord> {
        v.into_iter().map(FeedEntry::into_record).collect()
    };
    Ok(OnThisDay {
        events: conv(feed.events),
        births: conv(feed.births),
        deaths: conv(feed.deaths),
    })
}

/// Parse a page summary body into one record.
pub fn parse_summary(body: &[u8], fallback_title: &str) -> Result<SourceRecord> {
    let s: PageSummary = serde_json::from_slice(body).map_err(|e| Error::Parse(e.to_string()))?;
    let title = if s.title.trim().is_empty() {
        fallback_title.to_string()
    } else {
        s.title
    };
    Ok(SourceRecord {
        title,
        snippet: clip(&s.extract, SUMMARY_MAX_CHARS),
        url: desktop_url(&s.content_urls).unwrap_or_default(),
    })
}

/// Parse an opensearch body: `[query, [titles], [descriptions], [urls]]`.
pub fn parse_opensearch(body: &[u8]) -> Result<Vec<SourceRecord>> {
    let v: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| Error::Parse(e.to_string()))?;
    let Some(arr) = v.as_array().filter(|a| a.len() >= 4) else {
        return Err(Error::Parse("unexpected opensearch shape".to_string()));
    };
    let col = |i: usize| -> Vec<String> {
        arr[i]
            .as_array()
            .map(|xs| {
                xs.iter()
                    .map(|x| x.as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default()
    };
    let (titles, descs, urls) = (col(1), col(2), col(3));
    Ok(titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| SourceRecord {
            title,
            snippet: descs
                .get(i)
                .map(|d| clip(d, EXTRACT_MAX_CHARS))
                .unwrap_or_default(),
            url: urls.get(i).cloned().unwrap_or_default(),
        })
        .collect())
}

impl WikipediaClient {
    pub fn new(
        backend: Arc<dyn FetchBackend>,
        rest_endpoint: impl Into<String>,
        api_endpoint: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            backend,
            rest_endpoint: rest_endpoint.into(),
            api_endpoint: api_endpoint.into(),
            timeout_ms,
        }
    }

    fn rest_url(&self, segments: &[&str]) -> Result<String> {
        let mut u =
            url::Url::parse(&self.rest_endpoint).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        u.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.rest_endpoint.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(u.to_string())
    }

    pub fn on_this_day_url(&self, month: u32, day: u32) -> Result<String> {
        let (m, d) = (format!("{month:02}"), format!("{day:02}"));
        self.rest_url(&["feed", "onthisday", "all", &m, &d])
    }

    pub fn summary_url(&self, title: &str) -> Result<String> {
        let title = title.trim().replace(' ', "_");
        self.rest_url(&["page", "summary", &title])
    }

    pub fn opensearch_url(&self, query: &str, limit: usize) -> Result<String> {
        let limit = limit.to_string();
        url::Url::parse_with_params(
            &self.api_endpoint,
            &[
                ("action", "opensearch"),
                ("search", query),
                ("limit", limit.as_str()),
                ("namespace", "0"),
                ("format", "json"),
            ],
        )
        .map(|u| u.to_string())
        .map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    async fn get(&self, url: String) -> Result<trivia_core::FetchResponse> {
        let mut req = FetchRequest::get(url);
        req.timeout_ms = Some(self.timeout_ms);
        self.backend.fetch(&req).await
    }

    /// Month/day are sent as given; the upstream decides what 02/30 means.
    pub async fn on_this_day(&self, month: u32, day: u32) -> Result<OnThisDay> {
        let resp = self.get(self.on_this_day_url(month, day)?).await?;
        if !resp.is_success() {
            return Err(Error::Status(resp.status));
        }
        parse_on_this_day(&resp.bytes)
    }

    /// `Ok(None)` when the article does not exist.
    pub async fn summary(&self, title: &str) -> Result<Option<SourceRecord>> {
        let resp = self.get(self.summary_url(title)?).await?;
        if resp.status == 404 {
            return Ok(None);
        }
        if !resp.is_success() {
            return Err(Error::Status(resp.status));
        }
        parse_summary(&resp.bytes, title).map(Some)
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SourceRecord>> {
        let resp = self.get(self.opensearch_url(query, limit)?).await?;
        if !resp.is_success() {
            return Err(Error::Status(resp.status));
        }
        let mut out = parse_opensearch(&resp.bytes)?;
        out.truncate(limit);
        Ok(out)
    }
}
