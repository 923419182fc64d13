//! Metro station coordinate upkeep and nearest-station lookup.
//!
//! Maintains a JSON collection of metro stations ("facilities"), resolving
//! their coordinates from map search pages and keeping them at a fixed
//! precision, then attaches the nearest station to each point of interest
//! in a query dataset.

pub mod config;
pub mod domain;
pub mod enrich;
pub mod geo;
pub mod maintenance;
pub mod nearest;
pub mod resolver;
pub mod store;
pub mod summary;
