//! Facility collection upkeep: resolving coordinates, enforcing precision,
//! and verifying the result.
//!
//! Each operation loads the collection, works on it in memory, and saves it
//! back once at the end. Per-facility failures are recorded in the returned
//! [`RunSummary`]; only store errors abort an operation.

use futures::StreamExt;
use futures::stream;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{BoundingBox, Facility, Precision};
use crate::resolver::{CoordinateResolver, MapSearch};
use crate::store::{FacilityStore, StoreError};
use crate::summary::RunSummary;

/// Which facilities a resolve pass should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Coordinates missing or outside the region
    Unresolved,
    /// Also coordinates that are present but stored with too few digits
    Imprecise,
}

impl Selection {
    fn includes(self, facility: &Facility, bounds: &BoundingBox, precision: Precision) -> bool {
        let Some(coordinate) = facility.coordinate() else {
            return true;
        };
        if !bounds.contains(coordinate) {
            return true;
        }
        match self {
            Selection::Unresolved => false,
            Selection::Imprecise => {
                !(precision.is_precise(coordinate.latitude)
                    && precision.is_precise(coordinate.longitude))
            }
        }
    }
}

/// Resolve coordinates for the selected facilities, updating them in place.
///
/// Up to `max_concurrent` facilities are resolved at once. Results are
/// applied in collection order, whatever order they complete in.
pub async fn resolve_facilities<S: MapSearch>(
    facilities: &mut [Facility],
    resolver: &CoordinateResolver<S>,
    region: &str,
    selection: Selection,
    max_concurrent: usize,
) -> RunSummary {
    let mut summary = RunSummary::new();
    let bounds = *resolver.bounds();
    let precision = resolver.precision();

    let mut pending = Vec::new();
    for (i, facility) in facilities.iter().enumerate() {
        if selection.includes(facility, &bounds, precision) {
            pending.push((i, facility.name.clone()));
        } else {
            summary.record_skip();
        }
    }

    let total = pending.len();
    let results: Vec<_> = stream::iter(pending.iter().enumerate())
        .map(|(n, (_, name))| {
            info!("[{}/{}] resolving {}", n + 1, total, name);
            resolver.resolve(name, region)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    for ((i, name), result) in pending.iter().zip(results) {
        match result {
            Ok(resolved) => {
                facilities[*i].set_coordinate(resolved.coordinate);
                summary.record_success();
            }
            Err(e) => {
                warn!(facility = %name, error = %e, "could not resolve coordinates");
                summary.record_failure(name.as_str(), e);
            }
        }
    }

    summary
}

/// Round every present coordinate to `precision`. Facilities without
/// coordinates are recorded as failures.
pub fn normalize_facilities(facilities: &mut [Facility], precision: Precision) -> RunSummary {
    let mut summary = RunSummary::new();

    for facility in facilities.iter_mut() {
        match facility.coordinate() {
            Some(coordinate) => {
                facility.set_coordinate(coordinate.normalized(precision));
                summary.record_success();
            }
            None => summary.record_failure(facility.name.as_str(), "no coordinates to normalize"),
        }
    }

    summary
}

/// Outcome of checking one facility's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionStatus {
    Ok,
    /// Latitude or longitude absent
    Missing,
    /// Outside the region's bounding box
    OutOfRegion,
    /// Not representable at the required precision
    Unnormalized,
}

/// One row of a verification report.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionCheck {
    pub name: String,
    /// Fixed-precision renderings, when present
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub status: PrecisionStatus,
}

/// Per-facility verification results, in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecisionReport {
    pub checks: Vec<PrecisionCheck>,
}

impl PrecisionReport {
    /// True when every facility is [`PrecisionStatus::Ok`].
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.status == PrecisionStatus::Ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PrecisionCheck> {
        self.checks.iter().filter(|c| c.status != PrecisionStatus::Ok)
    }
}

/// Check that every facility has in-region coordinates that are unchanged by
/// normalization.
///
/// Values with trailing zeros (`22.5726` renders as `22.5726000`) pass; only
/// the force-fix selection treats them as candidates for re-resolution.
pub fn verify_precision(
    facilities: &[Facility],
    bounds: &BoundingBox,
    precision: Precision,
) -> PrecisionReport {
    let checks = facilities
        .iter()
        .map(|facility| {
            let status = match facility.coordinate() {
                None => PrecisionStatus::Missing,
                Some(c) if !bounds.contains(c) => PrecisionStatus::OutOfRegion,
                Some(c)
                    if !precision.is_normalized(c.latitude)
                        || !precision.is_normalized(c.longitude) =>
                {
                    PrecisionStatus::Unnormalized
                }
                Some(_) => PrecisionStatus::Ok,
            };

            PrecisionCheck {
                name: facility.name.clone(),
                latitude: facility.latitude.map(|v| precision.render(v)),
                longitude: facility.longitude.map(|v| precision.render(v)),
                status,
            }
        })
        .collect();

    PrecisionReport { checks }
}

/// Results of [`Maintenance::run_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunAllReport {
    pub resolved: RunSummary,
    pub force_fixed: RunSummary,
    pub normalized: RunSummary,
    pub verification: PrecisionReport,
}

impl RunAllReport {
    /// The run succeeded if the collection verifies at the end.
    pub fn is_success(&self) -> bool {
        self.verification.passed()
    }
}

/// Store-backed maintenance operations.
pub struct Maintenance<S> {
    store: FacilityStore,
    resolver: CoordinateResolver<S>,
    region_name: String,
    bounds: BoundingBox,
    precision: Precision,
    max_concurrent: usize,
}

impl<S: MapSearch> Maintenance<S> {
    pub fn new(store: FacilityStore, resolver: CoordinateResolver<S>, config: &Config) -> Self {
        Self {
            store,
            resolver,
            region_name: config.region.name.clone(),
            bounds: config.region.bounds,
            precision: config.precision,
            max_concurrent: config.resolver.max_concurrent,
        }
    }

    pub fn store(&self) -> &FacilityStore {
        &self.store
    }

    pub fn resolver(&self) -> &CoordinateResolver<S> {
        &self.resolver
    }

    /// Resolve facilities whose coordinates are missing or out of region.
    pub async fn resolve_missing(&self) -> Result<RunSummary, StoreError> {
        self.resolve_selected(Selection::Unresolved).await
    }

    /// Like [`Self::resolve_missing`], but also re-resolve facilities whose
    /// coordinates are stored with too few digits.
    pub async fn force_fix(&self) -> Result<RunSummary, StoreError> {
        self.resolve_selected(Selection::Imprecise).await
    }

    async fn resolve_selected(&self, selection: Selection) -> Result<RunSummary, StoreError> {
        let mut facilities = self.store.load()?;
        info!(count = facilities.len(), ?selection, "resolving facility coordinates");

        let summary = resolve_facilities(
            &mut facilities,
            &self.resolver,
            &self.region_name,
            selection,
            self.max_concurrent,
        )
        .await;

        if summary.succeeded > 0 {
            self.store.save(&facilities)?;
        }
        info!("{summary}");
        Ok(summary)
    }

    /// Round every stored coordinate to the configured precision.
    pub fn normalize_all(&self) -> Result<RunSummary, StoreError> {
        let mut facilities = self.store.load()?;
        let summary = normalize_facilities(&mut facilities, self.precision);
        self.store.save(&facilities)?;
        info!("{summary}");
        Ok(summary)
    }

    /// Check the stored collection without modifying it.
    pub fn verify(&self) -> Result<PrecisionReport, StoreError> {
        let facilities = self.store.load()?;
        Ok(verify_precision(&facilities, &self.bounds, self.precision))
    }

    /// Replace the stored collection with the built-in seed.
    pub fn create_seed(&self) -> Result<Vec<Facility>, StoreError> {
        self.store.create_seed()
    }

    /// Resolve, force-fix, normalize, then verify.
    pub async fn run_all(&self) -> Result<RunAllReport, StoreError> {
        let resolved = self.resolve_missing().await?;
        let force_fixed = self.force_fix().await?;
        let normalized = self.normalize_all()?;
        let verification = self.verify()?;

        Ok(RunAllReport {
            resolved,
            force_fixed,
            normalized,
            verification,
        })
    }
}
