//! Persistence for the facility collection and other JSON documents.

mod error;
mod facilities;
mod json;
mod seed;

pub use error::StoreError;
pub use facilities::FacilityStore;
pub use json::{read_json, write_json_atomic};
pub use seed::seed_facilities;
