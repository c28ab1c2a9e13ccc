//! Common API types: errors and request options

use crate::core::constants::MAX_HOST_MILLIS;
use crate::host::HostValue;
use std::time::Duration;
use thiserror::Error;

/// Result type for geolocation operations
pub type GeoResult<T> = Result<T, GeoError>;

/// Geolocation error kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum GeoError {
    /// The caller does not have permission to use geolocation
    #[error("permission denied")]
    PermissionDenied,
    /// No location provider could determine the position
    #[error("position unavailable")]
    PositionUnavailable,
    /// The request's timeout elapsed before a fix was acquired
    #[error("timeout")]
    Timeout,
    /// An optional reading was not supplied by the host
    #[error("value unknown")]
    Unknown,
    /// Heading requested while the device is not moving
    #[error("device stationary")]
    Stationary,
    /// Pull attempted on a closed watcher
    #[error("watcher closed")]
    WatcherClosed,
    /// Host reported an error code outside the known set
    #[error("{message}")]
    Host { message: String },
    /// Host record lacked a required field or carried the wrong type
    #[error("malformed host record: missing or invalid `{field}`")]
    MalformedRecord { field: String },
}

impl GeoError {
    /// True if the operation may be retried with a reasonable chance of
    /// success
    pub fn is_temporary(&self) -> bool {
        matches!(self, GeoError::PositionUnavailable | GeoError::Timeout)
    }

    pub(crate) fn malformed(field: &str) -> Self {
        GeoError::MalformedRecord {
            field: field.to_string(),
        }
    }
}

/// Position request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionOptions {
    /// Hint that the best possible accuracy is wanted, at the cost of
    /// latency or power
    pub high_accuracy: bool,
    /// Maximum time allowed until a position or an error is returned.
    /// `None` (or zero) waits indefinitely.
    pub timeout: Option<Duration>,
    /// Maximum age of an acceptable cached position. Zero forces a fresh fix.
    pub maximum_age: Duration,
}

impl PositionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_maximum_age(mut self, maximum_age: Duration) -> Self {
        self.maximum_age = maximum_age;
        self
    }

    /// Timeout in host milliseconds, or `None` if no timeout should be sent.
    ///
    /// The host treats `timeout: 0` as "fail immediately", so a zero timeout
    /// is never sent and a sub-millisecond one rounds up to 1.
    pub fn timeout_millis(&self) -> Option<u64> {
        match self.timeout {
            Some(timeout) if !timeout.is_zero() => Some(to_host_millis(timeout).max(1)),
            _ => None,
        }
    }

    pub fn maximum_age_millis(&self) -> u64 {
        to_host_millis(self.maximum_age)
    }

    /// Translate into the parameter object the host expects
    pub fn to_host_value(&self) -> HostValue {
        let mut value = HostValue::object();

        if self.high_accuracy {
            value.set("enableHighAccuracy", true);
        }

        if let Some(timeout_ms) = self.timeout_millis() {
            value.set("timeout", timeout_ms);
        }

        value.set("maximumAge", self.maximum_age_millis());
        value
    }

    /// Translate optional options; `None` yields the host's default shape
    pub fn host_value_for(options: Option<&PositionOptions>) -> HostValue {
        match options {
            Some(options) => options.to_host_value(),
            None => PositionOptions::default().to_host_value(),
        }
    }
}

fn to_host_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .min(MAX_HOST_MILLIS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_temporary_classification() {
        assert!(GeoError::PositionUnavailable.is_temporary());
        assert!(GeoError::Timeout.is_temporary());

        assert!(!GeoError::PermissionDenied.is_temporary());
        assert!(!GeoError::Unknown.is_temporary());
        assert!(!GeoError::Stationary.is_temporary());
        assert!(!GeoError::WatcherClosed.is_temporary());
        assert!(!GeoError::Host { message: "odd".into() }.is_temporary());
        assert!(!GeoError::malformed("latitude").is_temporary());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GeoError::PermissionDenied.to_string(), "permission denied");
        assert_eq!(GeoError::Stationary.to_string(), "device stationary");
        assert_eq!(GeoError::WatcherClosed.to_string(), "watcher closed");
        assert_eq!(
            GeoError::Host { message: "sensor offline".into() }.to_string(),
            "sensor offline"
        );
        assert_eq!(
            GeoError::malformed("timestamp").to_string(),
            "malformed host record: missing or invalid `timestamp`"
        );
    }

    #[test]
    fn test_error_composes_with_box_dyn() {
        fn fails() -> Result<(), Box<dyn std::error::Error>> {
            Err(GeoError::Timeout)?;
            Ok(())
        }
        assert_eq!(fails().unwrap_err().to_string(), "timeout");
    }

    #[test]
    fn test_zero_options_omit_timeout() {
        let options = PositionOptions {
            high_accuracy: false,
            timeout: Some(Duration::ZERO),
            maximum_age: Duration::ZERO,
        };
        let value = options.to_host_value();
        assert!(!value.contains_key("timeout"));
        assert!(!value.contains_key("enableHighAccuracy"));
        assert_eq!(value.get("maximumAge").as_i64(), Some(0));
    }

    #[test]
    fn test_full_options_translation() {
        let options = PositionOptions::new()
            .with_high_accuracy(true)
            .with_timeout(Duration::from_millis(5000))
            .with_maximum_age(Duration::from_millis(1000));
        assert_eq!(
            options.to_host_value(),
            HostValue::from(json!({
                "enableHighAccuracy": true,
                "timeout": 5000,
                "maximumAge": 1000
            }))
        );
    }

    #[test]
    fn test_absent_options_default_shape() {
        let value = PositionOptions::host_value_for(None);
        assert_eq!(value, HostValue::from(json!({"maximumAge": 0})));
    }

    #[test]
    fn test_sub_millisecond_timeout_rounds_up() {
        let options = PositionOptions::new().with_timeout(Duration::from_micros(200));
        assert_eq!(options.timeout_millis(), Some(1));
    }

    #[test]
    fn test_huge_durations_clamped() {
        let options = PositionOptions::new().with_maximum_age(Duration::from_secs(u64::MAX));
        assert_eq!(options.maximum_age_millis(), MAX_HOST_MILLIS);
    }
}
