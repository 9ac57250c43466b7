//! DuckDuckGo HTML results page provider.
//!
//! The results page has no stable contract; selectors follow its current
//! markup (`div.result` blocks holding `a.result__a` and `.result__snippet`)
//! with a bare-anchor fallback. Anything that cannot be parsed yields fewer
//! records, never an error.

use crate::config::BROWSER_USER_AGENT;
use crate::extract::{clip, norm_ws};
use std::sync::Arc;
use trivia_core::{
    Error, FetchBackend, FetchRequest, Result, SearchProvider, SearchQuery, SourceRecord,
};

pub const SNIPPET_MAX_CHARS: usize = 200;

#[derive(Clone)]
pub struct DuckDuckGoProvider {
    backend: Arc<dyn FetchBackend>,
    endpoint: String,
    timeout_ms: u64,
}

impl DuckDuckGoProvider {
    pub fn new(backend: Arc<dyn FetchBackend>, endpoint: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            backend,
            endpoint: endpoint.into(),
            timeout_ms,
        }
    }

    pub fn request_url(&self, query: &str) -> Result<String> {
        url::Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map(|u| u.to_string())
            .map_err(|e| Error::InvalidUrl(e.to_string()))
    }
}

/// Turn a result href into the target URL.
///
/// Result links are usually redirects like `//duckduckgo.com/l/?uddg=<encoded>&rut=..`.
pub fn resolve_href(href: &str) -> String {
    let href = href.trim();
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let Ok(u) = url::Url::parse(&absolute) else {
        return href.to_string();
    };
    if u.path().starts_with("/l/") {
        if let Some((_, target)) = u.query_pairs().find(|(k, _)| k == "uddg") {
            return target.into_owned();
        }
    }
    absolute
}

fn element_text(el: &html_scraper::ElementRef) -> String {
    // Highlight tags (<b>) can split words; join without separators.
    norm_ws(&el.text().collect::<String>())
}

fn record_from_anchor(
    a: &html_scraper::ElementRef,
    snippet: Option<html_scraper::ElementRef>,
) -> Option<SourceRecord> {
    let title = element_text(a);
    if title.is_empty() {
        return None;
    }
    let url = a.value().attr("href").map(resolve_href).unwrap_or_default();
    let snippet = snippet
        .map(|s| clip(&element_text(&s), SNIPPET_MAX_CHARS))
        .unwrap_or_default();
    Some(SourceRecord {
        title,
        snippet,
        url,
    })
}

/// Parse up to `max_results` records out of a results page.
pub fn parse_results_page(html: &str, max_results: usize) -> Vec<SourceRecord> {
    let mut out = Vec::new();
    if max_results == 0 {
        return out;
    }
    let doc = html_scraper::Html::parse_document(html);
    let (Ok(block_sel), Ok(title_sel), Ok(snippet_sel)) = (
        html_scraper::Selector::parse("div.result"),
        html_scraper::Selector::parse("a.result__a"),
        html_scraper::Selector::parse(".result__snippet"),
    ) else {
        return out;
    };

    for block in doc.select(&block_sel) {
        if out.len() >= max_results {
            break;
        }
        let Some(a) = block.select(&title_sel).next() else {
            continue;
        };
        if let Some(r) = record_from_anchor(&a, block.select(&snippet_sel).next()) {
            out.push(r);
        }
    }

    // Markup drift: block class renamed but anchors kept.
    if out.is_empty() {
        for a in doc.select(&title_sel).take(max_results) {
            if let Some(r) = record_from_anchor(&a, None) {
                out.push(r);
            }
        }
    }
    out
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, q: &SearchQuery) -> Result<Vec<SourceRecord>> {
        let mut req = FetchRequest::get(self.request_url(&q.query)?)
            .with_header("user-agent", BROWSER_USER_AGENT);
        req.timeout_ms = Some(self.timeout_ms);
        let resp = self
            .backend
            .fetch(&req)
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        if !resp.is_success() {
            return Err(Error::Status(resp.status));
        }
        let html = resp.text_lossy();
        if html.trim().is_empty() {
            return Err(Error::Parse("empty results page".to_string()));
        }
        Ok(parse_results_page(&html, q.max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
    <html><body>
      <div class="results">
        <div class="result results_links results_links_deep web-result">
          <h2 class="result__title">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRoman_Empire&amp;rut=abc">Roman <b>Empire</b> - Wikipedia</a>
          </h2>
          <a class="result__snippet" href="#">The Roman Empire was the state ruled by the Romans.</a>
        </div>
        <div class="result">
          <a class="result__a" href="https://www.history.com/rome">Ancient Rome facts</a>
        </div>
        <div class="result">
          <a class="result__a" href="https://example.com/3">Third</a>
          <div class="result__snippet">three</div>
        </div>
      </div>
    </body></html>
    "##;

    #[test]
    fn parses_blocks_and_decodes_redirects() {
        let rs = parse_results_page(PAGE, 10);
        assert_eq!(rs.len(), 3);
        assert_eq!(rs[0].title, "Roman Empire - Wikipedia");
        assert_eq!(rs[0].url, "https://en.wikipedia.org/wiki/Roman_Empire");
        assert_eq!(
            rs[0].snippet,
            "The Roman Empire was the state ruled by the Romans."
        );
        assert_eq!(rs[1].url, "https://www.history.com/rome");
        assert_eq!(rs[1].snippet, "");
        assert_eq!(rs[2].snippet, "three");
    }

    #[test]
    fn respects_max_results() {
        assert_eq!(parse_results_page(PAGE, 2).len(), 2);
        assert!(parse_results_page(PAGE, 0).is_empty());
    }

    #[test]
    fn falls_back_to_bare_anchors() {
        let html = r#"<ul><li><a class="result__a" href="https://a.example">A</a></li>
            <li><a class="result__a" href="https://b.example">B</a></li></ul>"#;
        let rs = parse_results_page(html, 5);
        assert_eq!(rs.len(), 2);
        assert_eq!(rs[1].title, "B");
    }

    #[test]
    fn unrelated_markup_yields_nothing() {
        assert!(parse_results_page("<html><body><p>captcha</p></body></html>", 5).is_empty());
        assert!(parse_results_page("", 5).is_empty());
    }

    #[test]
    fn snippets_are_clipped() {
        let long = "word ".repeat(200);
        let html = format!(
            r#"<div class="result"><a class="result__a" href="https://x">X</a><a class="result__snippet">{long}</a></div>"#
        );
        let rs = parse_results_page(&html, 1);
        assert!(rs[0].snippet.chars().count() <= SNIPPET_MAX_CHARS);
        assert!(rs[0].snippet.ends_with('…'));
    }

    #[test]
    fn resolve_href_keeps_plain_links() {
        assert_eq!(resolve_href("https://example.com/a"), "https://example.com/a");
        assert_eq!(resolve_href("/relative"), "/relative");
    }
}
