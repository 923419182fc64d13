//! Metro station records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::coord::Coordinate;
use super::error::ValidationError;

/// A metro station with identity, metadata and (once resolved) coordinates.
///
/// Fields the tool does not know about are kept in `extra` so that a
/// load/save cycle never drops data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub short_code: String,
    pub location: String,
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Facility {
    /// Create a facility with no coordinates yet.
    pub fn new(
        name: impl Into<String>,
        short_code: impl Into<String>,
        location: impl Into<String>,
        lines: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            short_code: short_code.into(),
            location: location.into(),
            lines: lines.into_iter().map(Into::into).collect(),
            latitude: None,
            longitude: None,
            extra: Map::new(),
        }
    }

    /// Set the coordinates.
    pub fn with_coordinate(mut self, latitude: f64, longitude: f64) -> Self {
        self.set_coordinate(Coordinate::new(latitude, longitude));
        self
    }

    /// Returns the coordinate if both latitude and longitude are present.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.latitude = Some(coordinate.latitude);
        self.longitude = Some(coordinate.longitude);
    }
}

/// Check collection-level invariants: unique names, unique short codes, and
/// at least one line per facility.
///
/// Fails on the first violation in collection order.
pub fn validate_collection(facilities: &[Facility]) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    let mut codes = HashSet::new();

    for facility in facilities {
        if !names.insert(facility.name.as_str()) {
            return Err(ValidationError::DuplicateName(facility.name.clone()));
        }
        if !codes.insert(facility.short_code.as_str()) {
            return Err(ValidationError::DuplicateShortCode(
                facility.short_code.clone(),
            ));
        }
        if facility.lines.is_empty() {
            return Err(ValidationError::NoLines(facility.name.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kavi_subhash() -> Facility {
        Facility::new("Kavi Subhash", "KKVS", "New Garia", ["Blue Line", "Orange Line"])
            .with_coordinate(22.4721796, 88.3952919)
    }

    fn shahid_khudiram() -> Facility {
        Facility::new("Shahid Khudiram", "KSKD", "Briji/Dhalai Bridge", ["Blue Line"])
    }

    #[test]
    fn coordinate_requires_both_components() {
        let mut facility = shahid_khudiram();
        assert_eq!(facility.coordinate(), None);

        facility.latitude = Some(22.48);
        assert_eq!(facility.coordinate(), None);

        facility.longitude = Some(88.381);
        assert_eq!(facility.coordinate(), Some(Coordinate::new(22.48, 88.381)));
    }

    #[test]
    fn deserialize_keeps_unknown_fields() {
        let json = r#"{
            "name": "Kavi Subhash",
            "short_code": "KKVS",
            "location": "New Garia",
            "lines": ["Blue Line"],
            "latitude": 22.4721796,
            "longitude": 88.3952919,
            "opened": 2010
        }"#;

        let facility: Facility = serde_json::from_str(json).unwrap();
        assert_eq!(facility.latitude, Some(22.4721796));
        assert_eq!(facility.extra.get("opened"), Some(&Value::from(2010)));

        let back = serde_json::to_value(&facility).unwrap();
        assert_eq!(back["opened"], Value::from(2010));
        assert_eq!(back["short_code"], Value::from("KKVS"));
    }

    #[test]
    fn missing_coordinates_deserialize_as_none() {
        let json = r#"{"name": "A", "short_code": "A1", "location": "", "lines": ["Green Line"]}"#;
        let facility: Facility = serde_json::from_str(json).unwrap();
        assert_eq!(facility.coordinate(), None);

        let back = serde_json::to_value(&facility).unwrap();
        assert!(back.get("latitude").is_none());
    }

    #[test]
    fn valid_collection() {
        assert!(validate_collection(&[kavi_subhash(), shahid_khudiram()]).is_ok());
        assert!(validate_collection(&[]).is_ok());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut other = shahid_khudiram();
        other.name = "Kavi Subhash".to_string();
        assert_eq!(
            validate_collection(&[kavi_subhash(), other]),
            Err(ValidationError::DuplicateName("Kavi Subhash".into()))
        );
    }

    #[test]
    fn duplicate_short_code_rejected() {
        let mut other = shahid_khudiram();
        other.short_code = "KKVS".to_string();
        assert_eq!(
            validate_collection(&[kavi_subhash(), other]),
            Err(ValidationError::DuplicateShortCode("KKVS".into()))
        );
    }

    #[test]
    fn empty_lines_rejected() {
        let mut facility = shahid_khudiram();
        facility.lines.clear();
        assert_eq!(
            validate_collection(&[facility]),
            Err(ValidationError::NoLines("Shahid Khudiram".into()))
        );
    }
}
