//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use garagectl_config::ConfigError;
use garagectl_core::{CoreError, GateCommand};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const REJECTED: i32 = 5;
    pub const BUSY: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the gate controller at {url}")]
    #[diagnostic(
        code(garagectl::connection_failed),
        help(
            "Check that the controller is powered and reachable from this machine.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Gate controller at {url} sent a status this tool cannot read")]
    #[diagnostic(code(garagectl::bad_status), help("{message}"))]
    BadStatus { url: String, message: String },

    // ── Commands ─────────────────────────────────────────────────────
    #[error("The gate controller did not accept the {command} command")]
    #[diagnostic(
        code(garagectl::rejected),
        help(
            "The device refused the request or could not be reached.\n\
             Check the token with: garagectl config set-token"
        )
    )]
    Rejected { command: GateCommand },

    #[error("Another operation is already in progress")]
    #[diagnostic(code(garagectl::busy), help("Wait for the current open/close to finish."))]
    Busy,

    // ── Configuration ────────────────────────────────────────────────
    #[error("No gate controller URL configured")]
    #[diagnostic(
        code(garagectl::no_url),
        help(
            "Set one with: garagectl config set url <address>\n\
             Or pass --url / set GARAGECTL_URL.\n\
             Config file: {path}"
        )
    )]
    MissingUrl { path: String },

    #[error("No bearer token configured")]
    #[diagnostic(
        code(garagectl::no_token),
        help(
            "Store one with: garagectl config set-token\n\
             Or pass --token / set GARAGECTL_TOKEN."
        )
    )]
    MissingToken,

    #[error(transparent)]
    #[diagnostic(code(garagectl::config))]
    Config(#[from] ConfigError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(garagectl::validation))]
    Validation { field: String, reason: String },

    // ── Internal / IO / Serialization ────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(garagectl::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::MissingToken => exit_code::AUTH,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Busy => exit_code::BUSY,
            Self::MissingUrl { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceUnreachable { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::BadStatus { url, message } => Self::BadStatus { url, message },
            CoreError::MissingConfiguration { .. } => Self::MissingUrl {
                path: garagectl_config::config_path().display().to_string(),
            },
            CoreError::Config { message } => Self::Validation {
                field: "url".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}
