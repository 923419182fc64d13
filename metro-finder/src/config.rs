//! Runtime configuration.
//!
//! Region bounds, precision, earth radius, request pacing and file paths are
//! all carried here, so runs can be pointed at fixture files.

use std::path::PathBuf;

use crate::domain::{BoundingBox, Precision};
use crate::geo::EARTH_RADIUS_M;
use crate::resolver::ResolverConfig;

/// The deployment region: a name used in search queries and the bounding box
/// every resolved coordinate must fall inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub bounds: BoundingBox,
}

impl Region {
    pub fn new(name: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new("Kolkata", BoundingBox::default())
    }
}

/// Input and output file locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    /// The facility collection (JSON array)
    pub stations: PathBuf,
    /// Query points to enrich (`{"data": [...]}`)
    pub query_points: PathBuf,
    /// Where the enriched document is written
    pub enriched_output: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            stations: PathBuf::from("kolkata_metro_stations.json"),
            query_points: PathBuf::from("pandals_data.json"),
            enriched_output: PathBuf::from("pandals_with_metro_data.json"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub region: Region,
    pub precision: Precision,
    /// Sphere radius for distance calculations, in metres
    pub earth_radius_m: f64,
    pub resolver: ResolverConfig,
    pub paths: Paths,
}

impl Config {
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_earth_radius(mut self, meters: f64) -> Self {
        self.earth_radius_m = meters;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_paths(mut self, paths: Paths) -> Self {
        self.paths = paths;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            precision: Precision::default(),
            earth_radius_m: EARTH_RADIUS_M,
            resolver: ResolverConfig::default(),
            paths: Paths::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.region.name, "Kolkata");
        assert_eq!(config.region.bounds, BoundingBox::new(22.0, 23.0, 87.0, 89.0));
        assert_eq!(config.precision.digits(), 7);
        assert_eq!(config.earth_radius_m, 6_371_000.0);
        assert_eq!(config.paths.stations, PathBuf::from("kolkata_metro_stations.json"));
    }

    #[test]
    fn custom_config() {
        let config = Config::default()
            .with_region(Region::new("Delhi", BoundingBox::new(28.0, 29.0, 76.5, 77.5)))
            .with_precision(Precision::new(6))
            .with_earth_radius(6_378_137.0)
            .with_resolver(ResolverConfig::default().with_request_delay(Duration::ZERO))
            .with_paths(Paths {
                stations: "a.json".into(),
                query_points: "b.json".into(),
                enriched_output: "c.json".into(),
            });

        assert_eq!(config.region.name, "Delhi");
        assert_eq!(config.precision.digits(), 6);
        assert_eq!(config.earth_radius_m, 6_378_137.0);
        assert_eq!(config.resolver.request_delay, Duration::ZERO);
        assert_eq!(config.paths.enriched_output, PathBuf::from("c.json"));
    }
}
