//! Mock host implementation for testing and development

use crate::host::{GeolocationHost, HostFunc, HostValue, WatchId};
use log::debug;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::thread;

/// Scripted reply for a one-shot request
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Invoke the success callback with this record
    Position(HostValue),
    /// Invoke the error callback with this record
    Error(HostValue),
}

impl MockResponse {
    fn deliver(self, success: &HostFunc, error: &HostFunc) -> bool {
        match self {
            MockResponse::Position(record) => success.call(&record),
            MockResponse::Error(record) => error.call(&record),
        }
    }
}

#[derive(Default)]
struct MockState {
    scripted: VecDeque<MockResponse>,
    pending: VecDeque<(HostFunc, HostFunc)>,
    watches: BTreeMap<WatchId, (HostFunc, HostFunc)>,
    next_watch_id: i64,
    cleared: Vec<WatchId>,
    requested_options: Vec<HostValue>,
}

/// In-process fake of the platform geolocation service
///
/// One-shot requests are answered from a script, either synchronously or
/// from a spawned thread. Requests arriving with an empty script stay
/// pending until [`MockHost::complete_next_request`] answers them. Watches
/// are driven by [`MockHost::emit_position`] and [`MockHost::emit_error`].
#[derive(Default)]
pub struct MockHost {
    state: Mutex<MockState>,
    deliver_on_thread: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer scripted one-shot requests from a separate thread, the way an
    /// event-loop driven host would
    pub fn threaded() -> Self {
        Self {
            deliver_on_thread: true,
            ..Self::default()
        }
    }

    /// Queue a success reply for the next one-shot request
    pub fn respond_with_position(&self, record: HostValue) {
        self.state.lock().scripted.push_back(MockResponse::Position(record));
    }

    /// Queue an error reply for the next one-shot request
    pub fn respond_with_error(&self, code: i64, message: &str) {
        self.state
            .lock()
            .scripted
            .push_back(MockResponse::Error(Self::error_record(code, message)));
    }

    /// Number of one-shot requests still waiting for a reply
    pub fn pending_requests(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Answer the oldest pending one-shot request. Returns `false` if none is
    /// pending or its callbacks were already released.
    pub fn complete_next_request(&self, response: MockResponse) -> bool {
        let next = self.state.lock().pending.pop_front();
        match next {
            Some((success, error)) => response.deliver(&success, &error),
            None => false,
        }
    }

    /// Fire a position event on an active watch. Returns `false` if the
    /// watch is unknown or cleared.
    pub fn emit_position(&self, id: WatchId, record: HostValue) -> bool {
        let funcs = self.state.lock().watches.get(&id).cloned();
        match funcs {
            Some((success, _)) => success.call(&record),
            None => false,
        }
    }

    /// Fire an error event on an active watch
    pub fn emit_error(&self, id: WatchId, code: i64, message: &str) -> bool {
        let funcs = self.state.lock().watches.get(&id).cloned();
        match funcs {
            Some((_, error)) => error.call(&Self::error_record(code, message)),
            None => false,
        }
    }

    pub fn active_watches(&self) -> Vec<WatchId> {
        self.state.lock().watches.keys().copied().collect()
    }

    /// Every id passed to `clear_watch`, in call order
    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.state.lock().cleared.clone()
    }

    /// Every options object received, in call order
    pub fn requested_options(&self) -> Vec<HostValue> {
        self.state.lock().requested_options.clone()
    }

    /// Success record in the host's shape, optional readings null
    pub fn position_record(latitude: f64, longitude: f64, accuracy: f64, timestamp_ms: i64) -> HostValue {
        let coords = HostValue::object()
            .with("latitude", latitude)
            .with("longitude", longitude)
            .with("accuracy", accuracy)
            .with("altitude", HostValue::Null)
            .with("altitudeAccuracy", HostValue::Null)
            .with("heading", HostValue::Null)
            .with("speed", HostValue::Null);

        HostValue::object()
            .with("coords", coords)
            .with("timestamp", timestamp_ms)
    }

    /// Error record in the host's shape
    pub fn error_record(code: i64, message: &str) -> HostValue {
        HostValue::object()
            .with("code", code)
            .with("message", message)
    }
}

impl GeolocationHost for MockHost {
    fn get_current_position(&self, success: HostFunc, error: HostFunc, options: HostValue) {
        let scripted = {
            let mut state = self.state.lock();
            state.requested_options.push(options);
            match state.scripted.pop_front() {
                Some(response) => Some(response),
                None => {
                    state.pending.push_back((success.clone(), error.clone()));
                    None
                }
            }
        };

        let Some(response) = scripted else {
            debug!("mock host: no scripted reply, request left pending");
            return;
        };

        if self.deliver_on_thread {
            thread::spawn(move || {
                response.deliver(&success, &error);
            });
        } else {
            response.deliver(&success, &error);
        }
    }

    fn watch_position(&self, success: HostFunc, error: HostFunc, options: HostValue) -> WatchId {
        let mut state = self.state.lock();
        state.requested_options.push(options);
        state.next_watch_id += 1;
        let id = WatchId(state.next_watch_id);
        state.watches.insert(id, (success, error));
        id
    }

    fn clear_watch(&self, id: WatchId) {
        let mut state = self.state.lock();
        state.watches.remove(&id);
        state.cleared.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};

    fn recording_funcs() -> (HostFunc, HostFunc, Receiver<(bool, HostValue)>) {
        let (tx, rx) = unbounded();
        let ok_tx = tx.clone();
        let success = HostFunc::new(move |value| {
            let _ = ok_tx.send((true, value.clone()));
        });
        let error = HostFunc::new(move |value| {
            let _ = tx.send((false, value.clone()));
        });
        (success, error, rx)
    }

    #[test]
    fn test_scripted_reply_is_synchronous() {
        let host = MockHost::new();
        host.respond_with_error(2, "no fix");

        let (success, error, rx) = recording_funcs();
        host.get_current_position(success, error, HostValue::object());

        let (ok, record) = rx.try_recv().unwrap();
        assert!(!ok);
        assert_eq!(record.get("code").as_i64(), Some(2));
        assert_eq!(host.pending_requests(), 0);
    }

    #[test]
    fn test_unscripted_request_stays_pending() {
        let host = MockHost::new();
        let (success, error, rx) = recording_funcs();
        host.get_current_position(success, error, HostValue::object());

        assert_eq!(host.pending_requests(), 1);
        assert!(rx.try_recv().is_err());

        let record = MockHost::position_record(1.0, 2.0, 3.0, 4);
        assert!(host.complete_next_request(MockResponse::Position(record)));
        assert!(rx.try_recv().unwrap().0);
        assert!(!host.complete_next_request(MockResponse::Error(HostValue::Null)));
    }

    #[test]
    fn test_watch_lifecycle() {
        let host = MockHost::new();
        let (success, error, rx) = recording_funcs();
        let id = host.watch_position(success, error, HostValue::object());

        assert_eq!(host.active_watches(), vec![id]);
        assert!(host.emit_position(id, MockHost::position_record(0.0, 0.0, 1.0, 0)));
        assert!(host.emit_error(id, 3, "timeout"));
        assert_eq!(rx.try_iter().count(), 2);

        host.clear_watch(id);
        assert!(host.active_watches().is_empty());
        assert_eq!(host.cleared_watches(), vec![id]);
        assert!(!host.emit_position(id, MockHost::position_record(0.0, 0.0, 1.0, 0)));
    }

    #[test]
    fn test_watch_ids_are_distinct() {
        let host = MockHost::new();
        let (s1, e1, _rx1) = recording_funcs();
        let (s2, e2, _rx2) = recording_funcs();
        let first = host.watch_position(s1, e1, HostValue::object());
        let second = host.watch_position(s2, e2, HostValue::object());
        assert_ne!(first, second);
        assert_eq!(host.requested_options().len(), 2);
    }
}
