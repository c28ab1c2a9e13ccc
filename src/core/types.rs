//! Core data types for position fixes

use crate::api::types::{GeoError, GeoResult};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A place on Earth in the WGS84 reference system
#[derive(Debug, Clone, PartialEq)]
pub struct Coords {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Accuracy of latitude and longitude (meters)
    pub accuracy: f64,

    altitude: Option<f64>,
    altitude_accuracy: Option<f64>,
    heading: Option<f64>,
    speed: Option<f64>,
}

impl Coords {
    /// Create coordinates with every optional reading absent
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
        }
    }

    pub fn with_altitude(mut self, altitude: Option<f64>) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_altitude_accuracy(mut self, altitude_accuracy: Option<f64>) -> Self {
        self.altitude_accuracy = altitude_accuracy;
        self
    }

    /// `Some(f64::NAN)` records a stationary device
    pub fn with_heading(mut self, heading: Option<f64>) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    /// Height above the WGS84 ellipsoid (meters).
    /// Fails with [`GeoError::Unknown`] if the host did not supply it.
    pub fn altitude(&self) -> GeoResult<f64> {
        self.altitude.ok_or(GeoError::Unknown)
    }

    /// Accuracy of the altitude (meters)
    pub fn altitude_accuracy(&self) -> GeoResult<f64> {
        self.altitude_accuracy.ok_or(GeoError::Unknown)
    }

    /// Direction of travel in degrees, `0 <= heading < 360`, clockwise from
    /// true north.
    ///
    /// Fails with [`GeoError::Stationary`] when the device is not moving and
    /// with [`GeoError::Unknown`] when the host cannot report a heading.
    pub fn heading(&self) -> GeoResult<f64> {
        match self.heading {
            Some(heading) if heading.is_nan() => Err(GeoError::Stationary),
            Some(heading) => Ok(heading),
            None => Err(GeoError::Unknown),
        }
    }

    /// Horizontal speed (meters per second)
    pub fn speed(&self) -> GeoResult<f64> {
        self.speed.ok_or(GeoError::Unknown)
    }
}

/// Acquisition time of a fix, split the way the host reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch
    pub secs: i64,
    /// Millisecond remainder, always in `0..1000`
    pub millis: u32,
}

impl Timestamp {
    pub fn from_epoch_millis(ms: i64) -> Self {
        Self {
            secs: ms.div_euclid(1000),
            millis: ms.rem_euclid(1000) as u32,
        }
    }

    pub fn as_epoch_millis(&self) -> i64 {
        self.secs * 1000 + self.millis as i64
    }

    pub fn to_system_time(&self) -> SystemTime {
        let ms = self.as_epoch_millis();
        if ms >= 0 {
            UNIX_EPOCH + Duration::from_millis(ms as u64)
        } else {
            UNIX_EPOCH - Duration::from_millis(ms.unsigned_abs())
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let ms = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        };
        Self::from_epoch_millis(ms)
    }
}

/// A position fix: coordinates plus acquisition time
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coords: Coords,
    pub timestamp: Timestamp,
}
