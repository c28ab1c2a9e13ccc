//! Blocking geolocation API
//!
//! [`Geolocation`] owns the injected host collaborator. One-shot queries
//! block the calling thread until the host answers; watches hand out a
//! [`Watcher`] to pull from.

use crate::api::types::{GeoError, GeoResult, PositionOptions};
use crate::api::watcher::Watcher;
use crate::core::Position;
use crate::host::{GeolocationHost, HostFunc};
use crate::processing::convert::{error_from_host, position_from_host};
use crate::utils::config::GeolocationConfig;
use crossbeam_channel::{bounded, Sender, TrySendError};
use log::{debug, warn};
use std::sync::Arc;

/// Entry point to the host's geolocation capability
#[derive(Clone)]
pub struct Geolocation {
    host: Arc<dyn GeolocationHost>,
    defaults: PositionOptions,
}

impl Geolocation {
    /// Wrap a host collaborator, using default options for `None` requests
    pub fn new(host: Arc<dyn GeolocationHost>) -> Self {
        Self {
            host,
            defaults: PositionOptions::default(),
        }
    }

    /// Wrap a host collaborator, taking defaults for `None` requests from
    /// `config`
    pub fn with_config(host: Arc<dyn GeolocationHost>, config: &GeolocationConfig) -> Self {
        Self {
            host,
            defaults: config.to_options(),
        }
    }

    /// Options used when a request passes `None`
    pub fn default_options(&self) -> &PositionOptions {
        &self.defaults
    }

    /// Request the device position and wait for the host to answer.
    ///
    /// No retries happen here; callers may retry when
    /// [`GeoError::is_temporary`] says so.
    pub fn current_position(&self, options: Option<&PositionOptions>) -> GeoResult<Position> {
        let options = options.unwrap_or(&self.defaults);
        let (tx, rx) = bounded::<GeoResult<Position>>(1);

        let success = {
            let tx = tx.clone();
            HostFunc::new(move |record| {
                let result = position_from_host(record);
                if let Err(error) = &result {
                    warn!("host sent unusable position record: {}", error);
                }
                deliver_once(&tx, result);
            })
        };
        let error = HostFunc::new(move |record| {
            deliver_once(&tx, Err(error_from_host(record)));
        });

        debug!("requesting current position with {:?}", options);
        self.host
            .get_current_position(success.clone(), error.clone(), options.to_host_value());

        // Both senders live inside the callbacks, so this only fails if the
        // host released them without answering.
        let result = rx.recv().unwrap_or_else(|_| {
            Err(GeoError::Host {
                message: "host dropped the request without answering".to_string(),
            })
        });

        success.release();
        error.release();

        result
    }

    /// Start watching the device position
    pub fn watch_position(&self, options: Option<&PositionOptions>) -> Watcher {
        let options = options.unwrap_or(&self.defaults);
        debug!("starting position watch with {:?}", options);
        Watcher::start(self.host.clone(), options)
    }
}

fn deliver_once(tx: &Sender<GeoResult<Position>>, result: GeoResult<Position>) {
    match tx.try_send(result) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            warn!("host invoked a one-shot callback more than once; extra result dropped");
        }
        Err(TrySendError::Disconnected(_)) => {}
    }
}
