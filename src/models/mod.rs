//! Data models for the weather locations client
//!
//! - Location: a named place with weather status and temperature
//! - LocationsResponse: the list wrapper used on the wire

pub mod location;

// Re-export all public types for convenient access
pub use location::{Location, LocationsResponse, RANDOM_CITIES, Status, Tone};
