//! Geolocation
//!
//! Typed, blocking access to a host platform's geolocation service:
//! single-shot position queries and continuous position watching.
//!
//! The host is injected as a [`GeolocationHost`]; [`MockHost`] stands in for
//! it in tests.

pub mod core;
pub mod processing;
pub mod utils;
pub mod host;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Coords, Position, Timestamp};
pub use crate::host::{GeolocationHost, HostFunc, HostValue, MockHost, WatchId};
pub use crate::api::{
    Geolocation, Watcher, GeoError, GeoResult, PositionOptions,
    PositionFormatter, FormattedPosition, Reading, TextFormatter, JsonFormatter, CsvFormatter
};
pub use crate::utils::{ConfigError, GeolocationConfig};
