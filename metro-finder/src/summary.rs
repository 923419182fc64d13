//! Run statistics returned by every batch operation.

use std::fmt;

/// An item that could not be processed, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item: String,
    pub reason: String,
}

/// Running min/max/mean over distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    pub min: f64,
    pub max: f64,
    sum: f64,
    count: usize,
}

impl DistanceStats {
    fn new(first: f64) -> Self {
        Self {
            min: first,
            max: first,
            sum: first,
            count: 1,
        }
    }

    fn add(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Counters for one invocation of a batch operation.
///
/// Every processed item lands in exactly one of `succeeded`, `failed` or
/// `skipped`; failed items are also listed in `failures` in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<ItemFailure>,
    pub distances: Option<DistanceStats>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, item: impl Into<String>, reason: impl fmt::Display) {
        self.total += 1;
        self.failed += 1;
        self.failures.push(ItemFailure {
            item: item.into(),
            reason: reason.to_string(),
        });
    }

    /// Fold a distance into the statistics. Does not touch the counters.
    pub fn record_distance(&mut self, meters: f64) {
        match &mut self.distances {
            Some(stats) => stats.add(meters),
            None => self.distances = Some(DistanceStats::new(meters)),
        }
    }

    /// True when no item failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed: {} succeeded, {} failed, {} skipped",
            self.total, self.succeeded, self.failed, self.skipped
        )
    }
}
