// Wire types for the gate controller's JSON API.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Snapshot of the gate as reported by `GET /gate/status`.
///
/// Optional timing fields are `None` when the device did not report them,
/// which is not the same as reporting zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStatus {
    #[serde(default = "unknown_status")]
    pub status: String,

    #[serde(default)]
    pub sensor_closed: bool,

    #[serde(default)]
    pub sensor_open: bool,

    #[serde(default)]
    pub alert_active: bool,

    #[serde(default)]
    pub auto_close_enabled: bool,

    /// Seconds the current or last movement has taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_time: Option<u64>,

    /// Seconds left before the movement is considered timed out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_remaining: Option<u64>,

    /// Configured auto-close delay in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close_time: Option<u64>,

    /// Seconds until the gate closes itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close_remaining: Option<u64>,
}

fn unknown_status() -> String {
    "unknown".into()
}

impl GateStatus {
    /// A status carrying only the position string, every other field defaulted.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            sensor_closed: false,
            sensor_open: false,
            alert_active: false,
            auto_close_enabled: false,
            operation_time: None,
            timeout_remaining: None,
            auto_close_time: None,
            auto_close_remaining: None,
        }
    }

    pub fn position(&self) -> GatePosition {
        GatePosition::from(self.status.as_str())
    }
}

/// Typed view of [`GateStatus::status`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GatePosition {
    Open,
    Closed,
    Opening,
    Closing,
    Unknown,
    /// Anything the device reports that we have no name for.
    Other(String),
}

impl From<&str> for GatePosition {
    fn from(raw: &str) -> Self {
        match raw {
            "open" => Self::Open,
            "closed" => Self::Closed,
            "opening" => Self::Opening,
            "closing" => Self::Closing,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for GatePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
            Self::Opening => f.write_str("opening"),
            Self::Closing => f.write_str("closing"),
            Self::Unknown => f.write_str("unknown"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// An authenticated movement command.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum GateCommand {
    Open,
    Close,
}

impl GateCommand {
    /// Endpoint path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Open => "gate/open",
            Self::Close => "gate/close",
        }
    }
}
