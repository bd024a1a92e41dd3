// garagectl-api: Async Rust client for network-attached gate controllers.
//
// Four endpoints (health, status, open, close) over a plain HTTP API.
// Every call has a `try_*` form returning `Result<_, Error>`; the plain
// forms collapse failures to `false` / `None` so callers that only care
// about "did it work" never handle transport errors.

pub mod base_url;
pub mod client;
pub mod error;
pub mod model;
pub mod transport;

pub use base_url::normalize_base_url;
pub use client::DeviceClient;
pub use error::Error;
pub use model::{GateCommand, GatePosition, GateStatus};
pub use transport::TransportConfig;
