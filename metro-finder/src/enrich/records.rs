//! Query points and enriched records.
//!
//! Both are kept as ordered JSON objects so that fields this tool does not
//! know about pass through untouched and in their original order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Coordinate, Precision, ValidationError};
use crate::nearest::Nearest;

/// Fields tried, in order, to name a query point in failure reports.
const IDENTIFIER_FIELDS: [&str; 2] = ["id", "name"];

/// Distances are reported with centimetre resolution.
const DISTANCE_PRECISION: Precision = Precision::new(2);

/// A point of interest to be matched against the nearest facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryPoint(Map<String, Value>);

impl QueryPoint {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The point's coordinate.
    ///
    /// Fails if `latitude` or `longitude` is absent or not a number, or if the
    /// pair is not a point on the globe.
    pub fn coordinate(&self) -> Result<Coordinate, ValidationError> {
        let latitude = self
            .0
            .get("latitude")
            .and_then(Value::as_f64)
            .ok_or(ValidationError::MissingCoordinate("latitude"))?;
        let longitude = self
            .0
            .get("longitude")
            .and_then(Value::as_f64)
            .ok_or(ValidationError::MissingCoordinate("longitude"))?;

        let coordinate = Coordinate::new(latitude, longitude);
        if !coordinate.is_on_globe() {
            return Err(ValidationError::OutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(coordinate)
    }

    /// A label for reports: the `id` or `name` field, else the 1-based
    /// position in the input.
    pub fn identifier(&self, index: usize) -> String {
        IDENTIFIER_FIELDS
            .iter()
            .find_map(|field| match self.0.get(*field)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("#{}", index + 1))
    }
}

/// A query point with its nearest facility merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedRecord(Map<String, Value>);

impl EnrichedRecord {
    /// Copy the point's fields and append the `nearest_facility_*` fields.
    pub fn new(point: &QueryPoint, nearest: &Nearest<'_>) -> Self {
        let facility = nearest.facility;
        let mut fields = point.fields().clone();

        fields.insert(
            "nearest_facility_id".to_string(),
            Value::from(facility.short_code.as_str()),
        );
        fields.insert(
            "nearest_facility_name".to_string(),
            Value::from(facility.name.as_str()),
        );
        fields.insert(
            "nearest_facility_location".to_string(),
            Value::from(facility.location.as_str()),
        );
        fields.insert(
            "nearest_facility_lines".to_string(),
            Value::from(facility.lines.clone()),
        );
        fields.insert(
            "nearest_facility_latitude".to_string(),
            Value::from(nearest.coordinate.latitude),
        );
        fields.insert(
            "nearest_facility_longitude".to_string(),
            Value::from(nearest.coordinate.longitude),
        );
        fields.insert(
            "nearest_facility_distance_meters".to_string(),
            Value::from(round_distance(nearest.distance_meters)),
        );

        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn nearest_facility_id(&self) -> Option<&str> {
        self.0.get("nearest_facility_id").and_then(Value::as_str)
    }

    pub fn distance_meters(&self) -> Option<f64> {
        self.0
            .get("nearest_facility_distance_meters")
            .and_then(Value::as_f64)
    }
}

/// Round a distance to 2 decimal places.
pub fn round_distance(meters: f64) -> f64 {
    DISTANCE_PRECISION.normalize(meters)
}
