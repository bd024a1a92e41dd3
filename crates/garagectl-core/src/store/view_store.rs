// ── View store ──
//
// Owns the `watch` channel behind `ViewState`. Each writer mutates under
// the channel's lock, so two activities never interleave partial writes
// to the same field, and subscribers are only woken by real changes.

use chrono::Utc;
use tokio::sync::watch;

use garagectl_api::GateStatus;

use super::ViewState;
use crate::stream::ViewStream;

/// Shared, observable [`ViewState`].
///
/// Field ownership: the poller writes `connected`, `last_status` and
/// `last_polled`; the command coordinator writes `last_status`,
/// `operating` and `operation_message`.
#[derive(Debug)]
pub struct ViewStore {
    state: watch::Sender<ViewState>,
}

impl ViewStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self { state }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> ViewStream {
        ViewStream::new(self.state.subscribe())
    }

    // ── Poller writes ────────────────────────────────────────────────

    /// Record the outcome of a health check and stamp the poll time.
    ///
    /// The timestamp alone does not wake subscribers.
    pub(crate) fn record_health(&self, connected: bool) {
        self.state.send_if_modified(|s| {
            s.last_polled = Some(Utc::now());
            let changed = s.connected != connected;
            s.connected = connected;
            changed
        });
    }

    /// Replace the last known status with a freshly fetched one.
    pub(crate) fn replace_status(&self, status: GateStatus) {
        self.state.send_if_modified(|s| {
            if s.last_status.as_ref() == Some(&status) {
                return false;
            }
            s.last_status = Some(status);
            true
        });
    }

    // ── Coordinator writes ───────────────────────────────────────────

    pub(crate) fn begin_operation(&self, message: String) {
        self.state.send_modify(|s| {
            s.operating = true;
            s.operation_message = Some(message);
        });
    }

    pub(crate) fn end_operation(&self) {
        self.state.send_if_modified(|s| {
            let changed = s.operating || s.operation_message.is_some();
            s.operating = false;
            s.operation_message = None;
            changed
        });
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starts_disconnected_with_no_status() {
        let store = ViewStore::new();
        assert_eq!(store.snapshot(), ViewState::default());
    }

    #[test]
    fn repeated_health_result_does_not_notify() {
        let store = ViewStore::new();
        let mut rx = store.state.subscribe();

        store.record_health(false);
        assert!(!rx.has_changed().unwrap());
        assert!(rx.borrow().last_polled.is_some());

        store.record_health(true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().connected);
    }

    #[test]
    fn identical_status_does_not_notify() {
        let store = ViewStore::new();
        store.replace_status(GateStatus::with_status("open"));

        let mut rx = store.state.subscribe();
        store.replace_status(GateStatus::with_status("open"));
        assert!(!rx.has_changed().unwrap());

        store.replace_status(GateStatus::with_status("closing"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().last_status,
            Some(GateStatus::with_status("closing"))
        );
    }

    #[test]
    fn operation_flag_and_message_move_together() {
        let store = ViewStore::new();

        store.begin_operation("Closing in progress…".into());
        let snap = store.snapshot();
        assert!(snap.operating);
        assert_eq!(snap.operation_message.as_deref(), Some("Closing in progress…"));

        store.end_operation();
        let snap = store.snapshot();
        assert!(!snap.operating);
        assert_eq!(snap.operation_message, None);
    }
}
