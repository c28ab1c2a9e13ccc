//! Conversion of host records into typed values

use crate::api::types::{GeoError, GeoResult};
use crate::core::constants::{PERMISSION_DENIED, POSITION_UNAVAILABLE, TIMEOUT};
use crate::core::{Coords, Position, Timestamp};
use crate::host::HostValue;
use log::warn;

fn required_f64(record: &HostValue, field: &str) -> GeoResult<f64> {
    record
        .get(field)
        .as_f64()
        .ok_or_else(|| GeoError::malformed(field))
}

/// Null and undefined are absent; NaN stays NaN
fn optional_f64(record: &HostValue, field: &str) -> GeoResult<Option<f64>> {
    let value = record.get(field);
    if value.is_nullish() {
        return Ok(None);
    }
    value
        .as_f64()
        .map(Some)
        .ok_or_else(|| GeoError::malformed(field))
}

/// Convert a host `coords` record
pub fn coords_from_host(record: &HostValue) -> GeoResult<Coords> {
    let coords = Coords::new(
        required_f64(record, "latitude")?,
        required_f64(record, "longitude")?,
        required_f64(record, "accuracy")?,
    )
    .with_altitude(optional_f64(record, "altitude")?)
    .with_altitude_accuracy(optional_f64(record, "altitudeAccuracy")?)
    .with_heading(optional_f64(record, "heading")?)
    .with_speed(optional_f64(record, "speed")?);

    Ok(coords)
}

/// Convert the record handed to a host success callback
pub fn position_from_host(record: &HostValue) -> GeoResult<Position> {
    let coords_record = record.get("coords");
    if !matches!(coords_record, HostValue::Object(_)) {
        return Err(GeoError::malformed("coords"));
    }

    let timestamp_ms = record
        .get("timestamp")
        .as_i64()
        .ok_or_else(|| GeoError::malformed("timestamp"))?;

    Ok(Position {
        coords: coords_from_host(coords_record)?,
        timestamp: Timestamp::from_epoch_millis(timestamp_ms),
    })
}

/// Convert the record handed to a host error callback
///
/// Codes outside the known set fall back to the host's free-text message.
pub fn error_from_host(record: &HostValue) -> GeoError {
    match record.get("code").as_i64() {
        Some(PERMISSION_DENIED) => GeoError::PermissionDenied,
        Some(POSITION_UNAVAILABLE) => GeoError::PositionUnavailable,
        Some(TIMEOUT) => GeoError::Timeout,
        code => {
            let message = record.get("message").as_str().unwrap_or_default().to_string();
            warn!("unrecognised host error code {:?}: {}", code, message);
            GeoError::Host { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> HostValue {
        HostValue::from(value)
    }

    #[test]
    fn test_null_fields_absent() {
        let coords = coords_from_host(&record(json!({
            "latitude": 10, "longitude": 20, "accuracy": 5,
            "altitude": null, "altitudeAccuracy": null, "heading": null, "speed": null
        })))
        .unwrap();

        assert_eq!(coords.latitude, 10.0);
        assert_eq!(coords.longitude, 20.0);
        assert_eq!(coords.accuracy, 5.0);
        assert_eq!(coords.altitude(), Err(GeoError::Unknown));
        assert_eq!(coords.heading(), Err(GeoError::Unknown));
    }

    #[test]
    fn test_missing_optional_fields_absent() {
        let coords = coords_from_host(&record(json!({
            "latitude": 1.5, "longitude": -2.5, "accuracy": 30
        })))
        .unwrap();
        assert_eq!(coords.speed(), Err(GeoError::Unknown));
        assert_eq!(coords.altitude_accuracy(), Err(GeoError::Unknown));
    }

    #[test]
    fn test_nan_heading_preserved() {
        let coords_record = record(json!({
            "latitude": 0, "longitude": 0, "accuracy": 1, "speed": 0
        }))
        .with("heading", f64::NAN);

        let coords = coords_from_host(&coords_record).unwrap();
        assert_eq!(coords.heading(), Err(GeoError::Stationary));
        assert_eq!(coords.speed(), Ok(0.0));
    }

    #[test]
    fn test_present_values_kept() {
        let coords = coords_from_host(&record(json!({
            "latitude": 59.91, "longitude": 10.75, "accuracy": 12,
            "altitude": 23.5, "altitudeAccuracy": 4, "heading": 270, "speed": 1.25
        })))
        .unwrap();
        assert_eq!(coords.altitude(), Ok(23.5));
        assert_eq!(coords.altitude_accuracy(), Ok(4.0));
        assert_eq!(coords.heading(), Ok(270.0));
        assert_eq!(coords.speed(), Ok(1.25));
    }

    #[test]
    fn test_missing_required_field() {
        let result = coords_from_host(&record(json!({"latitude": 1, "accuracy": 1})));
        assert_eq!(result, Err(GeoError::malformed("longitude")));
    }

    #[test]
    fn test_wrongly_typed_optional_field() {
        let result = coords_from_host(&record(json!({
            "latitude": 1, "longitude": 1, "accuracy": 1, "altitude": "high"
        })));
        assert_eq!(result, Err(GeoError::malformed("altitude")));
    }

    #[test]
    fn test_position_conversion() {
        let position = position_from_host(&record(json!({
            "coords": {"latitude": 10, "longitude": 20, "accuracy": 5},
            "timestamp": 1_500_250
        })))
        .unwrap();
        assert_eq!(position.timestamp, Timestamp { secs: 1500, millis: 250 });
        assert_eq!(position.coords.latitude, 10.0);
    }

    #[test]
    fn test_position_without_timestamp() {
        let result = position_from_host(&record(json!({
            "coords": {"latitude": 10, "longitude": 20, "accuracy": 5}
        })));
        assert_eq!(result, Err(GeoError::malformed("timestamp")));
    }

    #[test]
    fn test_position_without_coords() {
        let result = position_from_host(&record(json!({"timestamp": 0})));
        assert_eq!(result, Err(GeoError::malformed("coords")));
    }

    #[test]
    fn test_known_error_codes() {
        assert_eq!(
            error_from_host(&record(json!({"code": 1, "message": "User denied"}))),
            GeoError::PermissionDenied
        );
        assert_eq!(
            error_from_host(&record(json!({"code": 2, "message": ""}))),
            GeoError::PositionUnavailable
        );
        assert_eq!(
            error_from_host(&record(json!({"code": 3, "message": "timed out"}))),
            GeoError::Timeout
        );
    }

    #[test]
    fn test_unknown_error_code_uses_message() {
        let error = error_from_host(&record(json!({"code": 42, "message": "provider crashed"})));
        assert_eq!(error, GeoError::Host { message: "provider crashed".into() });
        assert!(!error.is_temporary());

        let error = error_from_host(&record(json!({})));
        assert_eq!(error, GeoError::Host { message: String::new() });
    }
}
