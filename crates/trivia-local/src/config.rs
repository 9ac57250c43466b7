//! Endpoint + transport configuration, read from the environment once at startup.
//!
//! Env vars (empty values count as unset):
//! - `TRIVIA_SEARCH_ENDPOINT` (default: DuckDuckGo's HTML endpoint)
//! - `TRIVIA_WIKIPEDIA_REST_ENDPOINT` (default: en.wikipedia.org REST v1)
//! - `TRIVIA_WIKIPEDIA_API_ENDPOINT` (default: en.wikipedia.org `api.php`)
//! - `TRIVIA_TIMEOUT_MS` (default: 15000, clamped to 1000..=60000)
//! - `TRIVIA_USER_AGENT`

use std::time::Duration;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_REST_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1";
pub const DEFAULT_API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Browser-like UA: the HTML search endpoint serves an empty page to unknown agents.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub search_endpoint: String,
    pub rest_endpoint: String,
    pub api_endpoint: String,
    pub timeout: Duration,
    /// Sent to the encyclopedia endpoints and as the client default.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            rest_endpoint: DEFAULT_REST_ENDPOINT.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: format!("trivia/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl SourceConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let timeout_ms = env("TRIVIA_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS)
            .clamp(1_000, 60_000);
        Self {
            search_endpoint: env("TRIVIA_SEARCH_ENDPOINT").unwrap_or(d.search_endpoint),
            rest_endpoint: env("TRIVIA_WIKIPEDIA_REST_ENDPOINT")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(d.rest_endpoint),
            api_endpoint: env("TRIVIA_WIKIPEDIA_API_ENDPOINT").unwrap_or(d.api_endpoint),
            timeout: Duration::from_millis(timeout_ms),
            user_agent: env("TRIVIA_USER_AGENT").unwrap_or(d.user_agent),
        }
    }

    /// Point every upstream at one base URL (fixture servers in tests).
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search_endpoint: format!("{base}/html/"),
            rest_endpoint: format!("{base}/api/rest_v1"),
            api_endpoint: format!("{base}/w/api.php"),
            ..Self::default()
        }
    }
}
