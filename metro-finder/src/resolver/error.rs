//! Resolver error types.

/// Errors from a single map search request.
///
/// The resolver treats all of these as a non-match for the attempt that
/// produced them; they never abort a resolution.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed (network error, timeout, body read failure)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The search endpoint answered with something other than 200 OK
    #[error("search returned status {status}")]
    Status { status: u16 },

    /// An endpoint could not be turned into a request URL
    #[error("invalid search endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

/// Errors from resolving a facility name to a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No attempt produced a coordinate inside the region
    #[error("no coordinates found for {name} after {attempts} attempts")]
    NotFound { name: String, attempts: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SearchError::Status { status: 429 };
        assert_eq!(err.to_string(), "search returned status 429");

        let err = SearchError::InvalidEndpoint {
            endpoint: "not a url".into(),
            message: "relative URL without a base".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid search endpoint not a url: relative URL without a base"
        );

        let err = ResolveError::NotFound {
            name: "Esplanade".into(),
            attempts: 9,
        };
        assert_eq!(
            err.to_string(),
            "no coordinates found for Esplanade after 9 attempts"
        );
    }
}
