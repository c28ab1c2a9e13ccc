//! Continuous position watching
//!
//! The host pushes events into per-kind queues; the [`Watcher`] lets the
//! caller pull them one at a time. Queues are unbounded: the host's callback
//! thread never blocks on a slow consumer and no fix is dropped.

use crate::api::types::{GeoError, GeoResult, PositionOptions};
use crate::core::Position;
use crate::host::{GeolocationHost, HostFunc, WatchId};
use crate::processing::convert::{error_from_host, position_from_host};
use crossbeam_channel::{select, unbounded, Receiver};
use log::{debug, trace, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Handle on an active position watch
///
/// Closing (explicitly or on drop) clears the host watch and releases both
/// callbacks. Items already queued remain readable through [`Watcher::chans`];
/// after that the receivers report disconnection.
pub struct Watcher {
    host: Arc<dyn GeolocationHost>,
    id: WatchId,

    position_callback: HostFunc,
    error_callback: HostFunc,

    positions: Receiver<Position>,
    errors: Receiver<GeoError>,

    closed: bool,
}

impl Watcher {
    pub(crate) fn start(host: Arc<dyn GeolocationHost>, options: &PositionOptions) -> Self {
        let (position_tx, positions) = unbounded();
        let (error_tx, errors) = unbounded();

        let position_callback = {
            let error_tx = error_tx.clone();
            HostFunc::new(move |record| match position_from_host(record) {
                Ok(position) => {
                    trace!("watch delivered position at {:?}", position.timestamp);
                    let _ = position_tx.send(position);
                }
                Err(error) => {
                    warn!("host sent unusable position record: {}", error);
                    let _ = error_tx.send(error);
                }
            })
        };

        let error_callback = HostFunc::new(move |record| {
            let error = error_from_host(record);
            trace!("watch delivered error: {}", error);
            let _ = error_tx.send(error);
        });

        let id = host.watch_position(
            position_callback.clone(),
            error_callback.clone(),
            options.to_host_value(),
        );
        debug!("host opened {}", id);

        Self {
            host,
            id,
            position_callback,
            error_callback,
            positions,
            errors,
            closed: false,
        }
    }

    /// Host subscription handle
    pub fn id(&self) -> WatchId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Block until the host delivers a position or an error.
    ///
    /// Temporary errors ([`GeoError::is_temporary`]) leave the watch usable;
    /// on a permanent one the caller should treat the watch as finished.
    /// Returns [`GeoError::WatcherClosed`] immediately once closed.
    pub fn next_position(&mut self) -> GeoResult<Position> {
        if self.closed {
            return Err(GeoError::WatcherClosed);
        }

        // While open the senders are owned by our own callbacks, so the
        // queues cannot disconnect under us.
        select! {
            recv(self.positions) -> position => position.map_err(|_| GeoError::WatcherClosed),
            recv(self.errors) -> error => Err(error.unwrap_or(GeoError::WatcherClosed)),
        }
    }

    /// Return a pending event without blocking, `None` if nothing is queued
    pub fn try_next_position(&mut self) -> Option<GeoResult<Position>> {
        if self.closed {
            return Some(Err(GeoError::WatcherClosed));
        }

        if let Ok(position) = self.positions.try_recv() {
            return Some(Ok(position));
        }
        self.errors.try_recv().ok().map(Err)
    }

    /// Like [`Watcher::next_position`] but gives up after `timeout`
    pub fn next_position_timeout(&mut self, timeout: Duration) -> Option<GeoResult<Position>> {
        if self.closed {
            return Some(Err(GeoError::WatcherClosed));
        }

        select! {
            recv(self.positions) -> position => Some(position.map_err(|_| GeoError::WatcherClosed)),
            recv(self.errors) -> error => Some(Err(error.unwrap_or(GeoError::WatcherClosed))),
            default(timeout) => None,
        }
    }

    /// The underlying position and error queues, for callers that
    /// multiplex several sources with `crossbeam_channel::select!`
    pub fn chans(&self) -> (&Receiver<Position>, &Receiver<GeoError>) {
        (&self.positions, &self.errors)
    }

    /// Unregister from the host and release the callbacks. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.host.clear_watch(self.id);

        // Dropping the closures drops the senders, disconnecting the queues
        self.position_callback.release();
        self.error_callback.release();

        debug!("closed {}", self.id);
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("id", &self.id)
            .field("closed", &self.closed)
            .field("queued_positions", &self.positions.len())
            .field("queued_errors", &self.errors.len())
            .finish()
    }
}
