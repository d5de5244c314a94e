//! `weather-locations` - keeps a local list of weather locations in sync
//! with a remote locations API
//!
//! The [`LocationListSynchronizer`] owns the list the user sees and drives a
//! [`LocationService`]; every successful add or remove is followed by a full
//! re-fetch so the local list never drifts from the server's.

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod settings;
pub mod synchronizer;
pub mod telemetry;

// Re-export core types for public API
pub use self::config::{AppConfig, ServiceConfig};
pub use error::LocationError;
pub use models::{Location, LocationsResponse, Status};
pub use service::{HttpLocationService, LocationService};
pub use settings::{ApiKey, FjallSettingsStore, MemorySettingsStore, SettingsStore};
pub use synchronizer::{ListState, LocationListSynchronizer, RemoveTarget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LocationError>;
