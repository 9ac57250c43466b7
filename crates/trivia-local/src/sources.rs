//! The one place upstream failures are absorbed.
//!
//! Every method returns an [`Outcome`]; errors are logged and turned into
//! `Unavailable(reason)`. Nothing here retries.

use crate::config::{SourceConfig, BROWSER_USER_AGENT};
use crate::extract::extract;
use crate::search::DuckDuckGoProvider;
use crate::wikipedia::WikipediaClient;
use crate::LocalFetcher;
use std::sync::Arc;
use trivia_core::{
    Error, FetchBackend, FetchRequest, OnThisDay, Outcome, Result, SearchProvider, SearchQuery,
    SourceRecord,
};

/// Character budget for text extracted from an arbitrary URL.
pub const PAGE_TEXT_MAX_CHARS: usize = 6_000;

/// Extracted text from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub final_url: String,
    pub text: String,
}

#[derive(Clone)]
pub struct Sources {
    backend: Arc<dyn FetchBackend>,
    search: Arc<dyn SearchProvider>,
    wiki: WikipediaClient,
    timeout_ms: u64,
}

fn absorb<T>(what: &str, r: Result<T>) -> Outcome<T> {
    if let Err(e) = &r {
        tracing::warn!(source = what, error = %e, "upstream unavailable");
    }
    r.into()
}

impl Sources {
    pub fn new(backend: Arc<dyn FetchBackend>, cfg: &SourceConfig) -> Self {
        let timeout_ms = cfg.timeout.as_millis() as u64;
        let search = Arc::new(DuckDuckGoProvider::new(
            backend.clone(),
            cfg.search_endpoint.clone(),
            timeout_ms,
        ));
        let wiki = WikipediaClient::new(
            backend.clone(),
            cfg.rest_endpoint.clone(),
            cfg.api_endpoint.clone(),
            timeout_ms,
        );
        Self {
            backend,
            search,
            wiki,
            timeout_ms,
        }
    }

    /// Production wiring: reqwest-backed fetcher.
    pub fn local(cfg: &SourceConfig) -> Result<Self> {
        let fetcher = LocalFetcher::new(cfg)?;
        Ok(Self::new(Arc::new(fetcher), cfg))
    }

    pub async fn search_web(&self, query: &str, max_results: usize) -> Outcome<Vec<SourceRecord>> {
        let q = SearchQuery {
            query: query.to_string(),
            max_results,
        };
        absorb(self.search.name(), self.search.search(&q).await)
    }

    pub async fn on_this_day(&self, month: u32, day: u32) -> Outcome<OnThisDay> {
        absorb("on_this_day", self.wiki.on_this_day(month, day).await)
    }

    pub async fn article_summary(&self, title: &str) -> Outcome<Option<SourceRecord>> {
        absorb("article_summary", self.wiki.summary(title).await)
    }

    pub async fn article_search(&self, query: &str, limit: usize) -> Outcome<Vec<SourceRecord>> {
        absorb("article_search", self.wiki.search(query, limit).await)
    }

    async fn fetch_page_inner(&self, url: &str) -> Result<PageText> {
        let mut req = FetchRequest::get(url.trim()).with_header("user-agent", BROWSER_USER_AGENT);
        req.timeout_ms = Some(self.timeout_ms);
        let resp = self.backend.fetch(&req).await?;
        if !resp.is_success() {
            return Err(Error::Status(resp.status));
        }
        Ok(PageText {
            text: extract(&resp.text_lossy(), PAGE_TEXT_MAX_CHARS),
            final_url: resp.final_url,
        })
    }

    /// GET an arbitrary URL and extract its text. Any content type is read as text.
    pub async fn fetch_page(&self, url: &str) -> Outcome<PageText> {
        absorb("fetch_page", self.fetch_page_inner(url).await)
    }
}
