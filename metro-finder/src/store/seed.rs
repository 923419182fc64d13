//! Built-in starting collection.

use crate::domain::Facility;

/// The initial station list written by `create_seed`.
///
/// Coordinates here are placeholders of varying precision; a resolve pass
/// replaces the under-precise ones.
pub fn seed_facilities() -> Vec<Facility> {
    vec![
        Facility::new("Kavi Subhash", "KKVS", "New Garia", ["Blue Line", "Orange Line"])
            .with_coordinate(22.4721796, 88.3952919),
        Facility::new("Shahid Khudiram", "KSKD", "Briji/Dhalai Bridge", ["Blue Line"])
            .with_coordinate(22.48, 88.381),
    ]
}
