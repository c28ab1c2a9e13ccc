//! Position output formatting and serialization
//!
//! Renders [`Position`] values as human-readable text, JSON, or CSV rows.

use crate::api::types::GeoError;
use crate::core::{Coords, Position};
use serde::{Serialize, Serializer};
use std::fmt;

/// State of an optional reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    /// Not supplied by the host
    Unknown,
    /// Heading of a device that is not moving
    Stationary,
}

impl Reading {
    fn from_accessor(result: Result<f64, GeoError>) -> Self {
        match result {
            Ok(value) => Reading::Value(value),
            Err(GeoError::Stationary) => Reading::Stationary,
            Err(_) => Reading::Unknown,
        }
    }

    fn rounded(self, precision: u8) -> Self {
        match self {
            Reading::Value(value) => Reading::Value(round_to_precision(value, precision)),
            other => other,
        }
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(value) => serializer.serialize_f64(*value),
            Reading::Unknown => serializer.serialize_none(),
            Reading::Stationary => serializer.serialize_str("stationary"),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(value) => write!(f, "{:.1}", value),
            Reading::Unknown => f.write_str("-"),
            Reading::Stationary => f.write_str("stationary"),
        }
    }
}

/// Flattened, serializable view of a position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub accuracy_m: f64,
    pub altitude_m: Reading,
    pub altitude_accuracy_m: Reading,
    pub heading_deg: Reading,
    pub speed_mps: Reading,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

/// Converts positions into [`FormattedPosition`]
pub struct PositionFormatter {
    /// Decimal places kept for floating-point values
    pub precision: u8,
}

impl Default for PositionFormatter {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl PositionFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn format(&self, position: &Position) -> FormattedPosition {
        let coords: &Coords = &position.coords;
        let p = self.precision;

        FormattedPosition {
            latitude_deg: round_to_precision(coords.latitude, p),
            longitude_deg: round_to_precision(coords.longitude, p),
            accuracy_m: round_to_precision(coords.accuracy, p),
            altitude_m: Reading::from_accessor(coords.altitude()).rounded(p),
            altitude_accuracy_m: Reading::from_accessor(coords.altitude_accuracy()).rounded(p),
            heading_deg: Reading::from_accessor(coords.heading()).rounded(p),
            speed_mps: Reading::from_accessor(coords.speed()).rounded(p),
            timestamp_ms: position.timestamp.as_epoch_millis(),
        }
    }
}

fn round_to_precision(value: f64, precision: u8) -> f64 {
    let multiplier = 10_f64.powi(precision as i32);
    (value * multiplier).round() / multiplier
}

/// Human-readable text formatter
#[derive(Default)]
pub struct TextFormatter {
    /// Single line instead of a block
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_text(&self, pos: &FormattedPosition) -> String {
        if self.compact {
            return format!(
                "Pos: {:.6}°, {:.6}° ±{:.1}m | Alt:{} Hdg:{} Spd:{} | t={}ms",
                pos.latitude_deg,
                pos.longitude_deg,
                pos.accuracy_m,
                pos.altitude_m,
                pos.heading_deg,
                pos.speed_mps,
                pos.timestamp_ms
            );
        }

        let mut output = String::new();
        output.push_str("Position:\n");
        output.push_str(&format!("  Latitude:  {:.6}°\n", pos.latitude_deg));
        output.push_str(&format!("  Longitude: {:.6}°\n", pos.longitude_deg));
        output.push_str(&format!("  Accuracy:  {:.1} m\n", pos.accuracy_m));
        output.push_str(&format!("  Altitude:  {} (±{}) m\n", pos.altitude_m, pos.altitude_accuracy_m));
        output.push_str(&format!("  Heading:   {}\n", pos.heading_deg));
        output.push_str(&format!("  Speed:     {} m/s\n", pos.speed_mps));
        output.push_str(&format!("  Timestamp: {} ms\n", pos.timestamp_ms));
        output
    }
}

/// JSON formatter for structured output
#[derive(Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, pos: &FormattedPosition) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(pos)
        } else {
            serde_json::to_string(pos)
        }
    }
}

/// CSV formatter for data logging. Unknown readings are empty cells.
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn header(&self) -> &'static str {
        "timestamp_ms,latitude,longitude,accuracy,altitude,altitude_accuracy,heading,speed"
    }

    pub fn format_csv(&self, pos: &FormattedPosition) -> String {
        let cell = |reading: Reading| match reading {
            Reading::Value(value) => value.to_string(),
            Reading::Unknown => String::new(),
            Reading::Stationary => "stationary".to_string(),
        };

        format!(
            "{},{},{},{},{},{},{},{}",
            pos.timestamp_ms,
            pos.latitude_deg,
            pos.longitude_deg,
            pos.accuracy_m,
            cell(pos.altitude_m),
            cell(pos.altitude_accuracy_m),
            cell(pos.heading_deg),
            cell(pos.speed_mps)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Timestamp;
    use serde_json::json;

    fn sample() -> Position {
        Position {
            coords: Coords::new(59.913_868_1, 10.752_245_4, 12.0)
                .with_altitude(Some(23.456))
                .with_heading(Some(f64::NAN)),
            timestamp: Timestamp::from_epoch_millis(1_700_000_000_250),
        }
    }

    #[test]
    fn test_readings_classified() {
        let formatted = PositionFormatter::new().format(&sample());
        assert_eq!(formatted.altitude_m, Reading::Value(23.456));
        assert_eq!(formatted.heading_deg, Reading::Stationary);
        assert_eq!(formatted.speed_mps, Reading::Unknown);
        assert_eq!(formatted.timestamp_ms, 1_700_000_000_250);
    }

    #[test]
    fn test_precision() {
        let formatted = PositionFormatter::new().with_precision(2).format(&sample());
        assert_eq!(formatted.latitude_deg, 59.91);
        assert_eq!(formatted.altitude_m, Reading::Value(23.46));
    }

    #[test]
    fn test_json_output() {
        let formatted = PositionFormatter::new().with_precision(3).format(&sample());
        let text = JsonFormatter::new().format_json(&formatted).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["heading_deg"], json!("stationary"));
        assert_eq!(value["speed_mps"], json!(null));
        assert_eq!(value["altitude_m"], json!(23.456));
        assert_eq!(value["timestamp_ms"], json!(1_700_000_000_250_i64));
    }

    #[test]
    fn test_text_output() {
        let formatted = PositionFormatter::new().format(&sample());
        let compact = TextFormatter { compact: true }.format_text(&formatted);
        assert!(compact.starts_with("Pos: 59.913868°, 10.752245°"));
        assert!(compact.contains("Hdg:stationary"));
        assert!(compact.contains("Spd:-"));

        let block = TextFormatter::new().format_text(&formatted);
        assert!(block.contains("  Heading:   stationary\n"));
    }

    #[test]
    fn test_csv_output() {
        let formatted = PositionFormatter::new().format(&sample());
        let csv = CsvFormatter.format_csv(&formatted);
        assert_eq!(CsvFormatter.header().split(',').count(), csv.split(',').count());
        assert!(csv.ends_with(",23.456,,stationary,"));
    }
}
