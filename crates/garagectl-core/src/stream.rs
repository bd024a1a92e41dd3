// ── Reactive view stream ──
//
// Subscription type for consuming view state changes from the ViewStore.

use tokio::sync::watch;

use crate::store::ViewState;

/// A subscription to the reconciled view state.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed).
pub struct ViewStream {
    current: ViewState,
    receiver: watch::Receiver<ViewState>,
}

impl ViewStream {
    pub(crate) fn new(mut receiver: watch::Receiver<ViewState>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot as of creation or the last [`changed()`](Self::changed).
    pub fn current(&self) -> &ViewState {
        &self.current
    }

    /// The latest snapshot (may have changed since the last `changed()`).
    pub fn latest(&self) -> ViewState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<ViewState> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}
