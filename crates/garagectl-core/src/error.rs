// ── Core error types ──
//
// Most of the engine never fails: polling and commands report through the
// view state and notices. `CoreError` covers the few places that do return
// a `Result` (diagnostic probes, task failures, client construction).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Device errors ────────────────────────────────────────────────
    #[error("Cannot reach gate controller at {url}: {reason}")]
    DeviceUnreachable { url: String, reason: String },

    #[error("Gate controller at {url} returned an unreadable status: {message}")]
    BadStatus { url: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Missing configuration: {what}")]
    MissingConfiguration { what: &'static str },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Attach the device URL to an API error.
    pub fn from_device(url: &str, err: garagectl_api::Error) -> Self {
        match err {
            garagectl_api::Error::Deserialization { message, body: _ } => Self::BadStatus {
                url: url.to_owned(),
                message,
            },
            garagectl_api::Error::Transport(_) | garagectl_api::Error::Status { .. } => {
                Self::DeviceUnreachable {
                    url: url.to_owned(),
                    reason: err.to_string(),
                }
            }
            other => other.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<garagectl_api::Error> for CoreError {
    fn from(err: garagectl_api::Error) -> Self {
        match err {
            garagectl_api::Error::BlankUrl => Self::MissingConfiguration { what: "device URL" },
            garagectl_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid device URL: {e}"),
            },
            garagectl_api::Error::Client(message) => Self::Config { message },
            garagectl_api::Error::Transport(ref e) => Self::DeviceUnreachable {
                url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: err.to_string(),
            },
            garagectl_api::Error::Status { .. } => Self::DeviceUnreachable {
                url: "<unknown>".into(),
                reason: err.to_string(),
            },
            garagectl_api::Error::Deserialization { message, body: _ } => Self::BadStatus {
                url: "<unknown>".into(),
                message,
            },
        }
    }
}
