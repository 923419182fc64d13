//! Domain types for the metro station dataset.
//!
//! Facilities enforce their collection-level invariants (unique names and
//! short codes, at least one line) through [`validate_collection`], and
//! coordinates carry the fixed-precision contract through [`Precision`].

mod coord;
mod error;
mod facility;

pub use coord::{BoundingBox, Coordinate, Precision};
pub use error::ValidationError;
pub use facility::{Facility, validate_collection};
