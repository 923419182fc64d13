//! Query-point input and enriched output documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::store::{StoreError, read_json, write_json_atomic};

use super::records::{EnrichedRecord, QueryPoint};

/// The query-point input file: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct QueryDocument {
    pub data: Vec<QueryPoint>,
}

/// Summary block of the enriched output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub total_pandals: usize,
    pub metro_stations_used: usize,
    pub processing_completed: bool,
}

/// The enriched output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDocument {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: Vec<EnrichedRecord>,
    pub metadata: OutputMetadata,
}

impl EnrichedDocument {
    pub fn new(records: Vec<EnrichedRecord>, facilities_used: usize) -> Self {
        Self {
            status_code: 200,
            metadata: OutputMetadata {
                total_pandals: records.len(),
                metro_stations_used: facilities_used,
                processing_completed: true,
            },
            data: records,
        }
    }
}

/// Read the query points from an input document.
pub fn read_query_points(path: &Path) -> Result<Vec<QueryPoint>, StoreError> {
    let document: QueryDocument = read_json(path)?;
    Ok(document.data)
}

/// Write the enriched document, replacing `path` atomically.
pub fn write_enriched(path: &Path, document: &EnrichedDocument) -> Result<(), StoreError> {
    write_json_atomic(path, document)
}
