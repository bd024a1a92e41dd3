use thiserror::Error;

/// Top-level error type for the `garagectl-api` crate.
///
/// Only visible through the `try_*` methods of [`DeviceClient`](crate::DeviceClient).
/// The collapsed methods downgrade every variant to `false` / `None`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The normalized base URL did not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No base URL configured.
    #[error("No device URL configured")]
    BlankUrl,

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    // ── Device responses ────────────────────────────────────────────
    /// The device answered with an unexpected status code.
    #[error("Device responded with HTTP {status}")]
    Status { status: u16 },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the next poll cycle might succeed without any
    /// configuration change.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the device rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403 })
    }
}
