//! Station name → coordinate resolution by scraping map search pages.
//!
//! There is no authoritative geocoding API behind this. Instead, each
//! facility name is rendered into a few query variants, each query is sent to
//! a few search endpoints, and each response is scanned for embedded
//! coordinates. The first coordinate that falls inside the region's bounding
//! box is accepted.
//!
//! Key characteristics:
//! - Attempts run in a fixed order and stop at the first valid match
//! - A failed request (timeout, non-200, unreadable body) is just a
//!   non-match for that attempt
//! - Requests are spaced by a courtesy delay shared across callers

mod error;
mod mock;
mod pacer;
mod search;
mod strategy;

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info};

use crate::domain::{BoundingBox, Coordinate, Precision};

pub use error::{ResolveError, SearchError};
pub use mock::MockMapSearch;
pub use pacer::Pacer;
pub use search::{CachedMapSearch, HttpMapSearch, MapSearch, SearchCacheConfig};
pub use strategy::{
    Attempt, CoordinatePattern, QueryPlacement, QueryTemplate, SearchEndpoint, extract,
    plan_attempts,
};

/// Default courtesy delay between requests.
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for coordinate resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Query phrasings, tried in order
    pub query_templates: Vec<QueryTemplate>,
    /// Search endpoints, tried in order for each query
    pub endpoints: Vec<SearchEndpoint>,
    /// Courtesy delay between requests
    pub request_delay: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum facilities resolved at once
    pub max_concurrent: usize,
    /// Response cache settings
    pub cache: SearchCacheConfig,
}

impl ResolverConfig {
    /// Set the courtesy delay between requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent resolutions (at least 1).
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Replace the query templates.
    pub fn with_query_templates(mut self, templates: Vec<QueryTemplate>) -> Self {
        self.query_templates = templates;
        self
    }

    /// Replace the search endpoints.
    pub fn with_endpoints(mut self, endpoints: Vec<SearchEndpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_templates: vec![
                QueryTemplate::new("{name} metro station {region}"),
                QueryTemplate::new("{name} station {region}"),
                QueryTemplate::new("metro {name} {region}"),
            ],
            endpoints: vec![
                SearchEndpoint::path("https://www.google.com/maps/search/"),
                SearchEndpoint::parameter("https://maps.google.com/maps", "q"),
                SearchEndpoint::path("https://maps.google.com/maps/place/"),
            ],
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: 1,
            cache: SearchCacheConfig::default(),
        }
    }
}

/// A successfully resolved coordinate and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The coordinate, normalized to the configured precision
    pub coordinate: Coordinate,
    pub pattern: CoordinatePattern,
    pub query: String,
    pub url: Url,
}

/// Resolves facility names to validated coordinates.
pub struct CoordinateResolver<S> {
    search: S,
    query_templates: Vec<QueryTemplate>,
    endpoints: Vec<SearchEndpoint>,
    bounds: BoundingBox,
    precision: Precision,
}

impl<S: MapSearch> CoordinateResolver<S> {
    /// Create a resolver.
    ///
    /// Fails if any configured endpoint cannot produce a request URL.
    pub fn new(
        search: S,
        config: &ResolverConfig,
        bounds: BoundingBox,
        precision: Precision,
    ) -> Result<Self, SearchError> {
        for endpoint in &config.endpoints {
            endpoint.url_for("probe")?;
        }

        Ok(Self {
            search,
            query_templates: config.query_templates.clone(),
            endpoints: config.endpoints.clone(),
            bounds,
            precision,
        })
    }

    /// Access the underlying search source.
    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// The attempts `resolve` would make for a name, in order.
    pub fn attempts(&self, name: &str, region: &str) -> Vec<Attempt> {
        plan_attempts(name, region, &self.query_templates, &self.endpoints)
    }

    /// Resolve a facility name within a region.
    ///
    /// Walks the attempts in order and returns the first coordinate inside
    /// the bounding box, normalized to the configured precision.
    pub async fn resolve(&self, name: &str, region: &str) -> Result<Resolved, ResolveError> {
        let attempts = self.attempts(name, region);

        for attempt in &attempts {
            let body = match self.search.fetch(&attempt.url).await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url = %attempt.url, error = %e, "search attempt failed");
                    continue;
                }
            };

            let Some((pattern, raw)) = extract(&body, &self.bounds) else {
                debug!(url = %attempt.url, "no in-region coordinates in response");
                continue;
            };

            let coordinate = raw.normalized(self.precision);
            info!(
                facility = name,
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                ?pattern,
                "resolved coordinates"
            );
            return Ok(Resolved {
                coordinate,
                pattern,
                query: attempt.query.clone(),
                url: attempt.url.clone(),
            });
        }

        Err(ResolveError::NotFound {
            name: name.to_string(),
            attempts: attempts.len(),
        })
    }
}
