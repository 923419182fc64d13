//! In-memory map search for offline runs and tests.
//!
//! Serves canned bodies or status codes for URLs containing a given
//! substring, and records every URL it is asked for.

use std::sync::{Mutex, PoisonError};

use reqwest::Url;

use super::error::SearchError;
use super::search::MapSearch;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

/// Map search that answers from a list of `(url substring, reply)` rules.
///
/// Rules are checked in the order they were added; the first whose substring
/// occurs in the requested URL answers. Unmatched URLs get a 404.
#[derive(Debug, Default)]
pub struct MockMapSearch {
    rules: Vec<(String, Reply)>,
    requests: Mutex<Vec<String>>,
}

impl MockMapSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `needle` with a 200 and `body`.
    pub fn with_body(mut self, needle: impl Into<String>, body: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Reply::Body(body.into())));
        self
    }

    /// Answer URLs containing `needle` with an error status.
    pub fn with_status(mut self, needle: impl Into<String>, status: u16) -> Self {
        self.rules.push((needle.into(), Reply::Status(status)));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MapSearch for MockMapSearch {
    async fn fetch(&self, url: &Url) -> Result<String, SearchError> {
        let url = url.as_str();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| url.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(SearchError::Status { status }),
            None => Err(SearchError::Status { status: 404 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_matching_rule_answers() {
        let mock = MockMapSearch::new()
            .with_status("search/Dum", 500)
            .with_body("search/", "@22.6,88.4");

        let dum_dum = Url::parse("https://maps.example/search/Dum%20Dum").unwrap();
        let esplanade = Url::parse("https://maps.example/search/Esplanade").unwrap();
        let other = Url::parse("https://maps.example/place/Esplanade").unwrap();

        assert!(matches!(
            mock.fetch(&dum_dum).await,
            Err(SearchError::Status { status: 500 })
        ));
        assert_eq!(mock.fetch(&esplanade).await.unwrap(), "@22.6,88.4");
        assert!(matches!(
            mock.fetch(&other).await,
            Err(SearchError::Status { status: 404 })
        ));
        assert_eq!(mock.requests().len(), 3);
    }
}
