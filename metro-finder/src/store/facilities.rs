//! Disk-backed facility collection.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{Facility, validate_collection};

use super::error::StoreError;
use super::json::{read_json, write_json_atomic};
use super::seed::seed_facilities;

/// Loads and saves the whole facility collection as a JSON array.
///
/// The collection is the unit of persistence: saves replace the file
/// atomically, and loads validate collection invariants before returning.
#[derive(Debug, Clone)]
pub struct FacilityStore {
    path: PathBuf,
}

impl FacilityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection in stored order.
    ///
    /// Fails with [`StoreError::NotFound`] if the file is missing and with
    /// [`StoreError::Invalid`] on duplicate names or short codes, or a
    /// facility without lines.
    pub fn load(&self) -> Result<Vec<Facility>, StoreError> {
        let facilities: Vec<Facility> = read_json(&self.path)?;
        validate_collection(&facilities)?;
        Ok(facilities)
    }

    /// Replace the stored collection.
    ///
    /// On failure the previously stored collection is left untouched.
    pub fn save(&self, facilities: &[Facility]) -> Result<(), StoreError> {
        validate_collection(facilities)?;
        write_json_atomic(&self.path, facilities)?;
        info!(path = %self.path.display(), count = facilities.len(), "saved facilities");
        Ok(())
    }

    /// Write the built-in seed collection, replacing any existing file.
    pub fn create_seed(&self) -> Result<Vec<Facility>, StoreError> {
        let facilities = seed_facilities();
        self.save(&facilities)?;
        Ok(facilities)
    }
}
