// ── Reconciled view state ──
//
// A single snapshot of what the user should see, with push-based change
// notification.

mod view_state;
mod view_store;

pub use view_state::ViewState;
pub use view_store::ViewStore;
