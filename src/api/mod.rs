//! Geolocation API
//!
//! Blocking one-shot queries, pull-style watches, and output formatting.

pub mod blocking;
pub mod watcher;
pub mod types;
pub mod formatting;

// Re-export commonly used API types
pub use types::{GeoError, GeoResult, PositionOptions};
pub use blocking::Geolocation;
pub use watcher::Watcher;
pub use formatting::{
    PositionFormatter, FormattedPosition, Reading, TextFormatter, JsonFormatter, CsvFormatter
};
