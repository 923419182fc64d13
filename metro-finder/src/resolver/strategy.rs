//! Query templates, search endpoints and coordinate extraction patterns.
//!
//! A resolution walks an ordered list of attempts (query template × endpoint,
//! query-major) and runs every response body through the extraction patterns
//! in priority order. The first coordinate inside the region wins.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::domain::{BoundingBox, Coordinate};

use super::error::SearchError;

/// A search phrase with `{name}` and `{region}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate(String);

impl QueryTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fill in the placeholders.
    ///
    /// ```
    /// use metro_finder::resolver::QueryTemplate;
    ///
    /// let template = QueryTemplate::new("{name} metro station {region}");
    /// assert_eq!(template.render("Esplanade", "Kolkata"), "Esplanade metro station Kolkata");
    /// ```
    pub fn render(&self, name: &str, region: &str) -> String {
        self.0.replace("{name}", name).replace("{region}", region)
    }
}

/// Where the query goes in an endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlacement {
    /// Appended as the last path segment (`.../search/<query>`)
    PathSegment,
    /// Sent as the named query parameter (`...?q=<query>`)
    Parameter(String),
}

/// A map search URL that a query can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    pub base: String,
    pub placement: QueryPlacement,
}

impl SearchEndpoint {
    /// An endpoint taking the query as its last path segment.
    pub fn path(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            placement: QueryPlacement::PathSegment,
        }
    }

    /// An endpoint taking the query as a URL parameter.
    pub fn parameter(base: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            placement: QueryPlacement::Parameter(name.into()),
        }
    }

    /// Build the request URL for a query, percent-encoding it.
    pub fn url_for(&self, query: &str) -> Result<Url, SearchError> {
        let invalid = |message: String| SearchError::InvalidEndpoint {
            endpoint: self.base.clone(),
            message,
        };

        let mut url = Url::parse(&self.base).map_err(|e| invalid(e.to_string()))?;
        match &self.placement {
            QueryPlacement::PathSegment => {
                url.path_segments_mut()
                    .map_err(|()| invalid("URL cannot take path segments".to_string()))?
                    .pop_if_empty()
                    .push(query);
            }
            QueryPlacement::Parameter(name) => {
                url.query_pairs_mut().append_pair(name, query);
            }
        }
        Ok(url)
    }
}

/// One planned request: the rendered query and the URL it is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub query: String,
    pub url: Url,
}

/// Expand templates × endpoints into attempts, query-major.
///
/// Endpoints that cannot produce a URL are left out.
pub fn plan_attempts(
    name: &str,
    region: &str,
    templates: &[QueryTemplate],
    endpoints: &[SearchEndpoint],
) -> Vec<Attempt> {
    let mut attempts = Vec::with_capacity(templates.len() * endpoints.len());
    for template in templates {
        let query = template.render(name, region);
        for endpoint in endpoints {
            match endpoint.url_for(&query) {
                Ok(url) => attempts.push(Attempt {
                    query: query.clone(),
                    url,
                }),
                Err(e) => tracing::warn!(error = %e, "skipping search endpoint"),
            }
        }
    }
    attempts
}

/// The shapes in which map pages embed coordinates, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatePattern {
    /// `@22.5726,88.3639` in a map URL
    AtSign,
    /// `!3d22.5726!4d88.3639` in a place data blob
    DataParameter,
    /// `center=22.5726%2C88.3639` in a static map URL
    CenterParameter,
    /// `"lat": 22.5726, "lng": 88.3639` in embedded JSON
    JsonLatLng,
    /// A bare `22.572600,88.363900` pair with 6-7 fractional digits
    BareDecimalPair,
}

static AT_SIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([0-9.-]+),([0-9.-]+)").expect("valid pattern"));
static DATA_PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!3d([0-9.-]+)!4d([0-9.-]+)").expect("valid pattern"));
static CENTER_PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"center=([0-9.-]+)%2C([0-9.-]+)").expect("valid pattern"));
static JSON_LAT_LNG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""lat":\s*([0-9.-]+),\s*"lng":\s*([0-9.-]+)"#).expect("valid pattern")
});
static BARE_DECIMAL_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2}\.[0-9]{6,7}),([0-9]{2,3}\.[0-9]{6,7})").expect("valid pattern")
});

impl CoordinatePattern {
    /// All patterns, highest priority first.
    pub const PRIORITY: [CoordinatePattern; 5] = [
        CoordinatePattern::AtSign,
        CoordinatePattern::DataParameter,
        CoordinatePattern::CenterParameter,
        CoordinatePattern::JsonLatLng,
        CoordinatePattern::BareDecimalPair,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            CoordinatePattern::AtSign => &AT_SIGN,
            CoordinatePattern::DataParameter => &DATA_PARAMETER,
            CoordinatePattern::CenterParameter => &CENTER_PARAMETER,
            CoordinatePattern::JsonLatLng => &JSON_LAT_LNG,
            CoordinatePattern::BareDecimalPair => &BARE_DECIMAL_PAIR,
        }
    }

    /// Every coordinate this pattern finds in `body`, in document order.
    ///
    /// Captures that do not parse as numbers are skipped.
    pub fn find_all(self, body: &str) -> impl Iterator<Item = Coordinate> + '_ {
        self.regex().captures_iter(body).filter_map(|caps| {
            let latitude = caps.get(1)?.as_str().parse().ok()?;
            let longitude = caps.get(2)?.as_str().parse().ok()?;
            Some(Coordinate::new(latitude, longitude))
        })
    }
}

/// Find the first in-region coordinate in a response body.
///
/// Patterns are tried in priority order; within a pattern, matches are tried
/// in document order. Returns the pattern that matched along with the raw
/// (unnormalized) coordinate.
pub fn extract(body: &str, bounds: &BoundingBox) -> Option<(CoordinatePattern, Coordinate)> {
    CoordinatePattern::PRIORITY.iter().find_map(|&pattern| {
        pattern
            .find_all(body)
            .find(|&coordinate| bounds.contains(coordinate))
            .map(|coordinate| (pattern, coordinate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kolkata() -> BoundingBox {
        BoundingBox::default()
    }

    #[test]
    fn each_pattern_shape() {
        let cases = [
            ("/maps/@22.5726,88.3639,15z", CoordinatePattern::AtSign),
            ("data=!3m1!3d22.5726!4d88.3639", CoordinatePattern::DataParameter),
            ("staticmap?center=22.5726%2C88.3639&zoom=15", CoordinatePattern::CenterParameter),
            (r#"{"lat": 22.5726, "lng": 88.3639}"#, CoordinatePattern::JsonLatLng),
            ("[null,22.572600,88.363900]", CoordinatePattern::BareDecimalPair),
        ];

        for (body, expected) in cases {
            let (pattern, coordinate) = extract(body, &kolkata()).unwrap();
            assert_eq!(pattern, expected, "body: {body}");
            assert_eq!(coordinate, Coordinate::new(22.5726, 88.3639), "body: {body}");
        }
    }

    #[test]
    fn higher_priority_pattern_wins_regardless_of_position() {
        let body = r#"{"lat": 22.6, "lng": 88.4} ... /@22.5726,88.3639,17z"#;
        let (pattern, coordinate) = extract(body, &kolkata()).unwrap();
        assert_eq!(pattern, CoordinatePattern::AtSign);
        assert_eq!(coordinate, Coordinate::new(22.5726, 88.3639));
    }

    #[test]
    fn first_in_region_match_within_pattern_wins() {
        let body = "@40.7128,-74.0060 then @22.5726,88.3639 then @22.6,88.4";
        let (_, coordinate) = extract(body, &kolkata()).unwrap();
        assert_eq!(coordinate, Coordinate::new(22.5726, 88.3639));
    }

    #[test]
    fn falls_through_to_lower_priority_when_out_of_region() {
        let body = "@51.5074,-0.1278 !3d22.4721796!4d88.3952919";
        let (pattern, coordinate) = extract(body, &kolkata()).unwrap();
        assert_eq!(pattern, CoordinatePattern::DataParameter);
        assert_eq!(coordinate, Coordinate::new(22.4721796, 88.3952919));
    }

    #[test]
    fn out_of_region_only_is_none() {
        assert_eq!(extract("@51.5074,-0.1278", &kolkata()), None);
        assert_eq!(extract("no coordinates here", &kolkata()), None);
    }

    #[test]
    fn unparsable_capture_skipped() {
        let body = "@22.5.7,88.3 @22.5726,88.3639";
        let (_, coordinate) = extract(body, &kolkata()).unwrap();
        assert_eq!(coordinate, Coordinate::new(22.5726, 88.3639));
    }

    #[test]
    fn path_endpoint_encodes_query() {
        let endpoint = SearchEndpoint::path("https://www.google.com/maps/search/");
        let url = endpoint.url_for("Kavi Subhash metro station Kolkata").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/maps/search/Kavi%20Subhash%20metro%20station%20Kolkata"
        );
    }

    #[test]
    fn parameter_endpoint_encodes_query() {
        let endpoint = SearchEndpoint::parameter("https://maps.google.com/maps", "q");
        let url = endpoint.url_for("Park Street Kolkata").unwrap();
        assert_eq!(url.as_str(), "https://maps.google.com/maps?q=Park+Street+Kolkata");
    }

    #[test]
    fn invalid_endpoint_is_an_error() {
        let endpoint = SearchEndpoint::path("not a url");
        assert!(matches!(
            endpoint.url_for("x"),
            Err(SearchError::InvalidEndpoint { .. })
        ));

        let endpoint = SearchEndpoint::path("mailto:someone@example.com");
        assert!(endpoint.url_for("x").is_err());
    }

    #[test]
    fn attempts_are_query_major() {
        let templates = [QueryTemplate::new("{name} A"), QueryTemplate::new("{name} B")];
        let endpoints = [
            SearchEndpoint::path("https://one.example/search/"),
            SearchEndpoint::parameter("https://two.example/maps", "q"),
        ];

        let attempts = plan_attempts("X", "Kolkata", &templates, &endpoints);
        let urls: Vec<&str> = attempts.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://one.example/search/X%20A",
                "https://two.example/maps?q=X+A",
                "https://one.example/search/X%20B",
                "https://two.example/maps?q=X+B",
            ]
        );
        assert_eq!(attempts[0].query, "X A");
    }

    #[test]
    fn attempts_skip_invalid_endpoints() {
        let templates = [QueryTemplate::new("{name}")];
        let endpoints = [
            SearchEndpoint::path("not a url"),
            SearchEndpoint::path("https://one.example/search/"),
        ];
        let attempts = plan_attempts("X", "Kolkata", &templates, &endpoints);
        assert_eq!(attempts.len(), 1);
    }

    #[test]
    fn template_render() {
        let template = QueryTemplate::new("metro {name} {region}");
        assert_eq!(template.render("Dum Dum", "Kolkata"), "metro Dum Dum Kolkata");
        assert_eq!(template.as_str(), "metro {name} {region}");
    }
}
