//! Coordinate types and the fixed-precision contract.

use std::fmt;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components are finite and within the ranges a
    /// point on the globe can take.
    pub fn is_on_globe(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Round both components to the given precision.
    pub fn normalized(self, precision: Precision) -> Self {
        Self {
            latitude: precision.normalize(self.latitude),
            longitude: precision.normalize(self.longitude),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// An inclusive latitude/longitude rectangle used to reject implausible
/// coordinates.
///
/// The default is the Kolkata deployment region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub const fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    /// Check whether a coordinate lies inside the box (edges included).
    ///
    /// NaN components are never inside.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coordinate.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&coordinate.longitude)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(22.0, 23.0, 87.0, 89.0)
    }
}

/// The number of fractional decimal digits a stored coordinate must carry.
///
/// # Examples
///
/// ```
/// use metro_finder::domain::Precision;
///
/// let precision = Precision::default();
/// assert_eq!(precision.normalize(22.47217964), 22.4721796);
/// assert_eq!(precision.render(22.48), "22.4800000");
/// assert!(!precision.is_precise(22.48));
/// assert!(precision.is_precise(22.4721796));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    digits: usize,
}

impl Precision {
    pub const fn new(digits: usize) -> Self {
        Self { digits }
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Round a value to exactly `digits` fractional digits.
    ///
    /// Rounding goes through the exact decimal expansion of the binary value,
    /// so exact ties round half-to-even and the result is idempotent.
    /// Non-finite values are returned unchanged.
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        self.render(value).parse().unwrap_or(value)
    }

    /// Render a value with exactly `digits` fractional digits.
    pub fn render(&self, value: f64) -> String {
        format!("{:.*}", self.digits, value)
    }

    /// Returns true if the value, in its shortest round-trip form, carries at
    /// least `digits` fractional digits.
    ///
    /// `22.48` was stored with two digits and is not precise, even though it
    /// renders as `22.4800000`.
    pub fn is_precise(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let shortest = value.to_string();
        let fraction_len = shortest
            .split_once('.')
            .map(|(_, fraction)| fraction.len())
            .unwrap_or(0);
        fraction_len >= self.digits
    }

    /// Returns true if normalizing the value would not change it.
    pub fn is_normalized(&self, value: f64) -> bool {
        self.normalize(value) == value
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(7)
    }
}
