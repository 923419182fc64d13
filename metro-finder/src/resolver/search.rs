//! Map search sources.
//!
//! [`HttpMapSearch`] fetches pages over HTTP, spacing requests with a shared
//! [`Pacer`]. [`CachedMapSearch`] wraps any source and remembers bodies by
//! URL, so repeated passes over the same facilities do not refetch.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use reqwest::Url;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};

use super::error::SearchError;
use super::pacer::Pacer;

/// Browser-like user agent; map pages serve a stripped-down document to
/// unknown clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A source of map search result pages.
pub trait MapSearch: Send + Sync {
    /// Fetch the body of the page at `url`.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, SearchError>> + Send;
}

/// Map search over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMapSearch {
    http: reqwest::Client,
    pacer: Arc<Pacer>,
}

impl HttpMapSearch {
    /// Create a client with a per-request timeout and a courtesy delay
    /// between requests.
    pub fn new(timeout_secs: u64, request_delay: Duration) -> Result<Self, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            pacer: Arc::new(Pacer::new(request_delay)),
        })
    }

    pub fn request_delay(&self) -> Duration {
        self.pacer.interval()
    }
}

impl MapSearch for HttpMapSearch {
    async fn fetch(&self, url: &Url) -> Result<String, SearchError> {
        self.pacer.wait().await;

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Configuration for the search response cache.
#[derive(Debug, Clone)]
pub struct SearchCacheConfig {
    /// TTL for cached bodies.
    pub ttl: Duration,

    /// Maximum number of cached bodies.
    pub max_capacity: u64,
}

impl Default for SearchCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Map search with a response cache keyed by URL.
///
/// Only successful responses are cached; failures are retried on the next
/// request for the same URL.
pub struct CachedMapSearch<S> {
    inner: S,
    bodies: MokaCache<String, Arc<str>>,
}

impl<S: MapSearch> CachedMapSearch<S> {
    pub fn new(inner: S, config: &SearchCacheConfig) -> Self {
        let bodies = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, bodies }
    }

    /// Access the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.bodies.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.bodies.invalidate_all();
    }
}

impl<S: MapSearch> MapSearch for CachedMapSearch<S> {
    async fn fetch(&self, url: &Url) -> Result<String, SearchError> {
        let key = url.as_str().to_string();

        if let Some(body) = self.bodies.get(&key).await {
            return Ok(body.to_string());
        }

        let body = self.inner.fetch(url).await?;
        self.bodies.insert(key, Arc::from(body.as_str())).await;

        Ok(body)
    }
}
