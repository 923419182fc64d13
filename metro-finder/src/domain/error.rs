//! Domain error types.
//!
//! These errors represent validation failures in facility and query-point
//! records. They are distinct from network and IO errors.

/// Validation failures for facility collections and query points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Two facilities share a name
    #[error("duplicate facility name: {0}")]
    DuplicateName(String),

    /// Two facilities share a short code
    #[error("duplicate facility short code: {0}")]
    DuplicateShortCode(String),

    /// A facility lists no service lines
    #[error("facility {0} has no service lines")]
    NoLines(String),

    /// A record has no usable latitude/longitude
    #[error("missing or non-numeric coordinate: {0}")]
    MissingCoordinate(&'static str),

    /// A coordinate is not a point on the globe
    #[error("coordinate out of range: {latitude}, {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
}
