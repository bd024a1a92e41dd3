use chrono::{DateTime, Utc};
use serde::Serialize;

use garagectl_api::{GatePosition, GateStatus};

/// Everything the presentation layer renders.
///
/// `operating` is true exactly when `operation_message` is set; both are
/// written together by the command coordinator and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Last health check answered HTTP 200.
    pub connected: bool,
    /// Last successfully fetched status. Kept when a later fetch fails.
    pub last_status: Option<GateStatus>,
    /// A command's settle period is running.
    pub operating: bool,
    pub operation_message: Option<String>,
    /// When the poller last finished a cycle.
    pub last_polled: Option<DateTime<Utc>>,
}

impl ViewState {
    pub fn position(&self) -> Option<GatePosition> {
        self.last_status.as_ref().map(GateStatus::position)
    }

    /// Offer "open" unless the gate already reports open or a command is running.
    pub fn can_open(&self) -> bool {
        !self.operating && self.position() != Some(GatePosition::Open)
    }

    /// Offer "close" unless the gate already reports closed or a command is running.
    pub fn can_close(&self) -> bool {
        !self.operating && self.position() != Some(GatePosition::Closed)
    }

    /// One-line human summary of the gate position, if any status is known.
    pub fn status_text(&self) -> Option<String> {
        let text = match self.position()? {
            GatePosition::Closed => "Gate: closed".to_owned(),
            GatePosition::Open => "Gate: open".to_owned(),
            GatePosition::Opening => "Opening in progress".to_owned(),
            GatePosition::Closing => "Closing in progress".to_owned(),
            GatePosition::Unknown => "Gate: position unknown".to_owned(),
            GatePosition::Other(raw) => format!("Gate: {raw}"),
        };
        Some(text)
    }
}
