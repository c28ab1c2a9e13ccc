//! Host collaborator abstraction
//!
//! The platform geolocation service is reached through the
//! [`GeolocationHost`] trait and injected into [`crate::Geolocation`]. The
//! host drives every callback; this crate only registers [`HostFunc`]s and
//! waits for them to fire.

pub mod value;
pub mod mock;

pub use value::HostValue;
pub use mock::MockHost;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Opaque subscription handle returned by the host for a position watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub i64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

type Callback = Box<dyn Fn(&HostValue) + Send>;

/// A callback registration handed to the host
///
/// Clones share one registration. Once [`HostFunc::release`] has been called
/// the wrapped closure is dropped and further invocations do nothing.
#[derive(Clone)]
pub struct HostFunc {
    inner: Arc<Mutex<Option<Callback>>>,
}

impl HostFunc {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&HostValue) + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    /// Invoke the callback. Returns `false` if the registration was released.
    pub fn call(&self, value: &HostValue) -> bool {
        let guard = self.inner.lock();
        match guard.as_ref() {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }

    /// Drop the wrapped closure. Idempotent.
    pub fn release(&self) {
        self.inner.lock().take();
    }

    pub fn is_released(&self) -> bool {
        self.inner.lock().is_none()
    }
}

impl fmt::Debug for HostFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunc")
            .field("released", &self.is_released())
            .finish()
    }
}

/// Platform geolocation capability
///
/// Implementations must invoke exactly one of `success` / `error` once per
/// `get_current_position` call, and may invoke either any number of times for
/// an active watch until `clear_watch` is called. Callbacks may be invoked
/// from any thread, including synchronously from within the call itself.
pub trait GeolocationHost: Send + Sync {
    /// Request a single position fix
    fn get_current_position(&self, success: HostFunc, error: HostFunc, options: HostValue);

    /// Start watching the device position
    fn watch_position(&self, success: HostFunc, error: HostFunc, options: HostValue) -> WatchId;

    /// Cancel a watch previously started with `watch_position`
    fn clear_watch(&self, id: WatchId);
}
