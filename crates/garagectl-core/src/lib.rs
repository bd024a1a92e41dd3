//! Polling and command reconciliation engine for a network-attached gate.
//!
//! This crate owns everything in `garagectl` that has temporal or
//! concurrent behavior:
//!
//! - **[`Controller`]**: Facade wiring the pieces together.
//!   [`start()`](Controller::start) spawns the status poller and
//!   [`shutdown()`](Controller::shutdown) stops it.
//!   [`issue_command()`](Controller::issue_command) runs an open/close to
//!   completion on its own task.
//!
//! - **[`Poller`]**: Checks `/health` and `/gate/status` every five seconds
//!   against the configured base URL, restarting from scratch whenever the
//!   URL changes.
//!
//! - **[`CommandCoordinator`]**: Sends a command, marks the gate as
//!   operating for the configured settle time, then refreshes the status.
//!   At most one command is in flight at a time.
//!
//! - **[`ViewStore`]**: The reconciled [`ViewState`] snapshot, published
//!   through a `tokio::sync::watch` channel and consumed via [`ViewStream`].
//!
//! - **[`SettingsStore`]**: Where the URL, token, and settle durations
//!   come from. [`MemorySettingsStore`] is the in-process implementation;
//!   `garagectl-config` provides a persistent one.

pub mod api;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod notice;
pub mod poller;
pub mod settings;
pub mod store;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::DeviceApi;
pub use command::{CommandCoordinator, CommandOutcome};
pub use config::Settings;
pub use controller::Controller;
pub use error::CoreError;
pub use notice::{Notice, NoticeLevel};
pub use poller::{DEFAULT_POLL_INTERVAL, Poller};
pub use settings::{MemorySettingsStore, SettingsStore};
pub use store::{ViewState, ViewStore};
pub use stream::ViewStream;

// Re-export wire types at the crate root for ergonomics.
pub use garagectl_api::{
    DeviceClient, GateCommand, GatePosition, GateStatus, TransportConfig, normalize_base_url,
};
