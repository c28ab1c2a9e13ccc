//! Host wire constants

/// Host error code: the document lacks permission to use geolocation
pub const PERMISSION_DENIED: i64 = 1;
/// Host error code: no location provider could produce a fix
pub const POSITION_UNAVAILABLE: i64 = 2;
/// Host error code: the request's timeout elapsed
pub const TIMEOUT: i64 = 3;

/// Largest millisecond value the host accepts for `timeout` / `maximumAge`
pub const MAX_HOST_MILLIS: u64 = u32::MAX as u64;
