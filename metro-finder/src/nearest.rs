//! Nearest-facility search.
//!
//! An exhaustive linear scan: at tens to hundreds of stations a spatial index
//! buys nothing. Ties on distance go to the facility that comes first in
//! collection order.

use crate::domain::{BoundingBox, Coordinate, Facility};
use crate::geo::{EARTH_RADIUS_M, distance_between};

/// Errors from nearest-facility search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NearestError {
    /// No facility has usable coordinates
    #[error("no facilities with usable coordinates available")]
    NoFacilitiesAvailable,
}

/// The closest facility to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub facility: &'a Facility,
    pub coordinate: Coordinate,
    pub distance_meters: f64,
}

/// The facilities eligible for search, in collection order.
///
/// Facilities without coordinates, or whose coordinates fall outside the
/// bounding box, are left out.
#[derive(Debug, Clone)]
pub struct FacilityIndex<'a> {
    entries: Vec<(&'a Facility, Coordinate)>,
    earth_radius_m: f64,
}

impl<'a> FacilityIndex<'a> {
    /// Build an index over `facilities`.
    ///
    /// Fails with [`NearestError::NoFacilitiesAvailable`] if none are usable.
    pub fn new(
        facilities: &'a [Facility],
        bounds: &BoundingBox,
        earth_radius_m: f64,
    ) -> Result<Self, NearestError> {
        let entries: Vec<_> = facilities
            .iter()
            .filter_map(|facility| {
                let coordinate = facility.coordinate()?;
                bounds.contains(coordinate).then_some((facility, coordinate))
            })
            .collect();

        if entries.is_empty() {
            return Err(NearestError::NoFacilitiesAvailable);
        }

        Ok(Self {
            entries,
            earth_radius_m,
        })
    }

    /// Number of facilities taking part in the search.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: construction rejects empty indexes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the facility closest to `(latitude, longitude)`.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Nearest<'a> {
        let query = Coordinate::new(latitude, longitude);
        let (first, first_coordinate) = self.entries[0];
        let mut best = Nearest {
            facility: first,
            coordinate: first_coordinate,
            distance_meters: distance_between(query, first_coordinate, self.earth_radius_m),
        };

        for &(facility, coordinate) in &self.entries[1..] {
            let distance_meters = distance_between(query, coordinate, self.earth_radius_m);
            // Strict comparison keeps the earlier facility on ties.
            if distance_meters < best.distance_meters {
                best = Nearest {
                    facility,
                    coordinate,
                    distance_meters,
                };
            }
        }

        best
    }
}

/// One-shot search over the Kolkata region ([`BoundingBox::default`]) on a
/// sphere of radius [`EARTH_RADIUS_M`].
///
/// Facilities outside that box are ignored. Use [`FacilityIndex::new`] to
/// search another region or with another radius.
pub fn nearest(
    latitude: f64,
    longitude: f64,
    facilities: &[Facility],
) -> Result<Nearest<'_>, NearestError> {
    let index = FacilityIndex::new(facilities, &BoundingBox::default(), EARTH_RADIUS_M)?;
    Ok(index.nearest(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_meters;

    fn station(name: &str, code: &str, lat: f64, lon: f64) -> Facility {
        Facility::new(name, code, "", ["Blue Line"]).with_coordinate(lat, lon)
    }

    fn three_stations() -> Vec<Facility> {
        vec![
            station("Dum Dum", "KDMI", 22.6215, 88.3925),
            station("Esplanade", "KESP", 22.5646, 88.3516),
            station("Kavi Subhash", "KKVS", 22.4721796, 88.3952919),
        ]
    }

    #[test]
    fn picks_analytically_closest() {
        let facilities = three_stations();
        let (lat, lon) = (22.5550, 88.3500);

        let expected = facilities
            .iter()
            .min_by(|a, b| {
                let da = haversine_meters(lat, lon, a.latitude.unwrap(), a.longitude.unwrap());
                let db = haversine_meters(lat, lon, b.latitude.unwrap(), b.longitude.unwrap());
                da.total_cmp(&db)
            })
            .unwrap();

        let found = nearest(lat, lon, &facilities).unwrap();
        assert_eq!(found.facility.name, expected.name);
        assert_eq!(found.facility.name, "Esplanade");
        assert_eq!(
            found.distance_meters,
            haversine_meters(lat, lon, 22.5646, 88.3516)
        );
    }

    #[test]
    fn exact_tie_goes_to_first_in_order() {
        // Binary-exact offsets either side of the query are exactly equidistant.
        let facilities = vec![
            station("West", "W", 22.5, 88.25),
            station("East", "E", 22.5, 88.75),
        ];
        let found = nearest(22.5, 88.5, &facilities).unwrap();
        assert_eq!(found.facility.name, "West");

        let reversed: Vec<_> = facilities.into_iter().rev().collect();
        let found = nearest(22.5, 88.5, &reversed).unwrap();
        assert_eq!(found.facility.name, "East");
    }

    #[test]
    fn empty_collection_is_an_error() {
        assert_eq!(
            nearest(22.5, 88.3, &[]).unwrap_err(),
            NearestError::NoFacilitiesAvailable
        );
    }

    #[test]
    fn unusable_facilities_are_skipped() {
        let facilities = vec![
            Facility::new("Unresolved", "U", "", ["Blue Line"]),
            station("London", "L", 51.5074, -0.1278),
            station("Esplanade", "KESP", 22.5646, 88.3516),
        ];

        let index =
            FacilityIndex::new(&facilities, &BoundingBox::default(), EARTH_RADIUS_M).unwrap();
        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
        assert_eq!(index.nearest(51.5, -0.12).facility.name, "Esplanade");
    }

    #[test]
    fn only_unusable_facilities_is_an_error() {
        let facilities = vec![Facility::new("Unresolved", "U", "", ["Blue Line"])];
        assert_eq!(
            nearest(22.5, 88.3, &facilities).unwrap_err(),
            NearestError::NoFacilitiesAvailable
        );
    }

    #[test]
    fn query_on_a_station_is_zero_distance() {
        let facilities = three_stations();
        let found = nearest(22.6215, 88.3925, &facilities).unwrap();
        assert_eq!(found.facility.short_code, "KDMI");
        assert_eq!(found.distance_meters, 0.0);
    }

    #[test]
    fn one_shot_search_is_limited_to_kolkata() {
        let facilities = vec![
            station("New Delhi", "DNDL", 28.6430, 77.2194),
            station("Esplanade", "KESP", 22.5646, 88.3516),
        ];

        let found = nearest(28.6139, 77.2090, &facilities).unwrap();
        assert_eq!(found.facility.name, "Esplanade");

        let delhi = BoundingBox::new(28.0, 29.0, 76.5, 77.5);
        let index = FacilityIndex::new(&facilities, &delhi, EARTH_RADIUS_M).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.nearest(28.6139, 77.2090).facility.name, "New Delhi");
    }
}
