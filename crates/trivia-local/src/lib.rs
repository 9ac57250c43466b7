use std::time::Duration;
use trivia_core::{Error, FetchBackend, FetchRequest, FetchResponse, Result};

pub mod config;
pub mod extract;
pub mod search;
pub mod sources;
pub mod wikipedia;

pub use config::SourceConfig;
pub use sources::Sources;

/// Default cap on response bodies. Pages bigger than this are cut, not rejected.
pub const DEFAULT_MAX_BYTES: u64 = 5_000_000;

#[derive(Debug, Clone)]
pub struct LocalFetcher {
    client: reqwest::Client,
}

impl LocalFetcher {
    pub fn new(cfg: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            // Avoid “hang forever” on DNS/TLS/body stalls; per-request timeouts still apply.
            .connect_timeout(Duration::from_secs(10))
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::Fetch(e.to_string()))?;
        Ok(Self { client })
    }

    fn apply_headers(
        mut rb: reqwest::RequestBuilder,
        req: &FetchRequest,
    ) -> reqwest::RequestBuilder {
        for (k, v) in &req.headers {
            if let (Ok(name), Ok(value)) = (
                reqwest::header::HeaderName::from_bytes(k.as_bytes()),
                reqwest::header::HeaderValue::from_str(v),
            ) {
                rb = rb.header(name, value);
            }
        }
        rb
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timeout".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.to_string()
    }
}

#[async_trait::async_trait]
impl FetchBackend for LocalFetcher {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse> {
        let url = url::Url::parse(&req.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut rb = self.client.get(url);
        if let Some(to) = req.timeout() {
            rb = rb.timeout(to);
        }
        rb = Self::apply_headers(rb, req);
        let t0 = std::time::Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|e| Error::Fetch(describe_reqwest_error(&e)))?;
        let final_url = resp.url().to_string();
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let max_bytes = req.max_bytes.unwrap_or(DEFAULT_MAX_BYTES) as usize;
        let mut truncated = false;
        let mut bytes = Vec::new();
        let mut stream = resp.bytes_stream();
        use futures_util::StreamExt;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Fetch(describe_reqwest_error(&e)))?;
            if bytes.len().saturating_add(chunk.len()) > max_bytes {
                let can_take = max_bytes.saturating_sub(bytes.len());
                bytes.extend_from_slice(&chunk[..can_take]);
                truncated = true;
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(
            url = %req.url,
            status,
            bytes = bytes.len(),
            truncated,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(FetchResponse {
            url: req.url.clone(),
            final_url,
            status,
            content_type,
            bytes,
            truncated,
        })
    }
}
