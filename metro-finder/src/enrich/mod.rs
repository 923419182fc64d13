//! Nearest-station enrichment of query points.
//!
//! Each query point is matched against the facility index in input order and
//! merged with its nearest facility into an [`EnrichedRecord`]. A point with
//! unusable coordinates is recorded as a failure and left out of the output;
//! it never stops the batch.

mod files;
mod records;

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{BoundingBox, Facility};
use crate::nearest::{FacilityIndex, NearestError};
use crate::store::{FacilityStore, StoreError};
use crate::summary::RunSummary;

pub use files::{
    EnrichedDocument, OutputMetadata, QueryDocument, read_query_points, write_enriched,
};
pub use records::{EnrichedRecord, QueryPoint, round_distance};

/// Errors that abort a whole enrichment run.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Nearest(#[from] NearestError),
}

/// Result of enriching a batch of query points.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// One record per successfully processed point, in input order
    pub records: Vec<EnrichedRecord>,
    pub summary: RunSummary,
    /// Number of facilities that took part in the search
    pub facilities_used: usize,
}

impl Enrichment {
    /// Turn the result into the output document.
    pub fn into_document(self) -> EnrichedDocument {
        EnrichedDocument::new(self.records, self.facilities_used)
    }
}

/// Enrich query points against a prepared index.
pub fn enrich_with_index(points: &[QueryPoint], index: &FacilityIndex<'_>) -> Enrichment {
    let mut records = Vec::with_capacity(points.len());
    let mut summary = RunSummary::new();

    for (i, point) in points.iter().enumerate() {
        let coordinate = match point.coordinate() {
            Ok(coordinate) => coordinate,
            Err(e) => {
                let id = point.identifier(i);
                warn!(point = %id, error = %e, "skipping query point");
                summary.record_failure(id, e);
                continue;
            }
        };

        let nearest = index.nearest(coordinate.latitude, coordinate.longitude);
        let record = EnrichedRecord::new(point, &nearest);
        if let Some(distance) = record.distance_meters() {
            summary.record_distance(distance);
        }
        summary.record_success();
        records.push(record);
    }

    Enrichment {
        records,
        summary,
        facilities_used: index.len(),
    }
}

/// Enrich query points with their nearest facility.
///
/// Fails only if no facility has usable coordinates.
pub fn enrich(
    points: &[QueryPoint],
    facilities: &[Facility],
    bounds: &BoundingBox,
    earth_radius_m: f64,
) -> Result<Enrichment, NearestError> {
    let index = FacilityIndex::new(facilities, bounds, earth_radius_m)?;
    Ok(enrich_with_index(points, &index))
}

/// Load facilities and query points from the configured paths, enrich, and
/// write the output document.
pub fn enrich_files(config: &Config) -> Result<RunSummary, EnrichError> {
    let facilities = FacilityStore::new(&config.paths.stations).load()?;
    let points = read_query_points(&config.paths.query_points)?;
    info!(
        points = points.len(),
        facilities = facilities.len(),
        "enriching query points"
    );

    let enrichment = enrich(
        &points,
        &facilities,
        &config.region.bounds,
        config.earth_radius_m,
    )?;
    let summary = enrichment.summary.clone();

    write_enriched(&config.paths.enriched_output, &enrichment.into_document())?;
    info!(
        path = %config.paths.enriched_output.display(),
        "{summary}"
    );

    Ok(summary)
}
