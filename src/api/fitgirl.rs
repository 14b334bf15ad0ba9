//! FitGirl Repacks lookup
//!
//! Not a real search: the query is turned into a post slug and the page at
//! that address is scraped for its first magnet link. The site rejects
//! requests without browser headers and rate-limits with 403s, so requests
//! carry a browser-like header set and 403s go through a [`RetryPolicy`].

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, info};

use super::build_client_or_default;
use super::retry::{RetryPolicy, Retryable, Sleeper, TokioSleeper};
use crate::models::GameRecord;

/// Public address of the repack site
pub const DEFAULT_BASE_URL: &str = "https://fitgirl-repacks.site";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Remote lookup errors
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("No page for this title (404)")]
    NotFound,

    #[error("Page has no magnet link")]
    NoMagnetLink,

    #[error("Blocked by the site (403)")]
    Blocked,

    #[error("Exceeded maximum retries ({attempts} attempts), still blocked. Make sure any VPN is disabled")]
    RetriesExhausted { attempts: u32 },

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl Retryable for RemoteError {
    fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Blocked)
    }
}

/// FitGirl Repacks client
#[derive(Clone)]
pub struct FitgirlClient {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl FitgirlClient {
    /// Create a client for the public site with default settings
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: build_client(&base_url, DEFAULT_TIMEOUT),
            base_url,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(&self.base_url, timeout);
        self
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace how backoff waits are performed
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Page address guessed for a query
    pub fn page_url(&self, query: &str) -> String {
        format!("{}/{}", self.base_url, slug(query))
    }

    /// Look up a title, reporting why nothing was found
    pub async fn lookup(&self, query: &str) -> Result<GameRecord, RemoteError> {
        let url = self.page_url(query);
        info!(query, url = %url, "Searching FitGirl Repacks");

        let result = self
            .retry
            .execute(self.sleeper.as_ref(), |attempt| {
                let url = url.clone();
                async move { self.fetch_page(&url, attempt).await }
            })
            .await;

        let html = match result {
            Ok(html) => html,
            Err(RemoteError::Blocked) => {
                return Err(RemoteError::RetriesExhausted {
                    attempts: self.retry.max_attempts,
                })
            }
            Err(e) => return Err(e),
        };

        let magnet = extract_magnet(&html).ok_or(RemoteError::NoMagnetLink)?;
        Ok(GameRecord::remote(query, magnet))
    }

    /// Best-effort lookup: every failure is logged and degrades to `None`
    pub async fn search(&self, query: &str) -> Option<GameRecord> {
        match self.lookup(query).await {
            Ok(record) => Some(record),
            Err(RemoteError::NotFound) => {
                info!(query, "Game not found on FitGirl Repacks");
                None
            }
            Err(RemoteError::NoMagnetLink) => {
                info!(query, "FitGirl Repacks page has no magnet link");
                None
            }
            Err(e @ RemoteError::RetriesExhausted { .. }) => {
                error!(query, error = %e, "Error fetching FitGirl Repacks");
                None
            }
            Err(e) => {
                error!(query, error = %e, "Error fetching the torrent page");
                None
            }
        }
    }

    async fn fetch_page(&self, url: &str, attempt: u32) -> Result<String, RemoteError> {
        debug!(url, attempt, "GET");
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            StatusCode::FORBIDDEN => Err(RemoteError::Blocked),
            status => Err(RemoteError::Status(status.as_u16())),
        }
    }
}

impl Default for FitgirlClient {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client carrying the browser-like header set the site expects
fn build_client(base_url: &str, timeout: Duration) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    if let Ok(referer) = HeaderValue::from_str(&format!("{}/", base_url)) {
        headers.insert(REFERER, referer);
    }
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Chromium\";v=\"115\", \"Not A;Brand\";v=\"99\", \"Google Chrome\";v=\"115\"",
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));

    build_client_or_default(
        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout),
    )
}

/// Post slug for a query: whitespace runs become `-`, lowercased
///
/// Characters outside the URL-safe set are percent-encoded.
pub fn slug(query: &str) -> String {
    let joined = query.split_whitespace().collect::<Vec<_>>().join("-");
    urlencoding::encode(&joined.to_lowercase()).into_owned()
}

// `href` must be preceded by whitespace so `data-href` and friends never match
static MAGNET_HREF: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"\s*(magnet:[^"]*)"|'\s*(magnet:[^']*)')"#).ok()
});

/// First `<a href="magnet:...">` in an HTML document
pub fn extract_magnet(html: &str) -> Option<String> {
    let re = MAGNET_HREF.as_ref()?;
    let caps = re.captures(html)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    Some(decode_entities(raw))
}

/// Decode the HTML entities that show up in WordPress-rendered hrefs
fn decode_entities(s: &str) -> String {
    s.replace("&#038;", "&")
        .replace("&#38;", "&")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
