// ── User-facing notices ──
//
// Transient messages for the presentation layer, the equivalent of a
// toast. Broadcast on a channel; a consumer that is not listening simply
// misses them.

use std::fmt;

use garagectl_api::GateCommand;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message produced by the command coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Base URL or token is blank; nothing was sent.
    MissingConfiguration,
    /// The device accepted the command and the gate is moving.
    InProgress(GateCommand),
    /// The device refused the command or could not be reached.
    CommandFailed(GateCommand),
    /// A command is already running.
    Busy,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::InProgress(_) => NoticeLevel::Info,
            Self::Busy => NoticeLevel::Warning,
            Self::MissingConfiguration | Self::CommandFailed(_) => NoticeLevel::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConfiguration => f.write_str("URL or token missing"),
            Self::InProgress(GateCommand::Open) => f.write_str("Opening in progress"),
            Self::InProgress(GateCommand::Close) => f.write_str("Closing in progress"),
            Self::CommandFailed(GateCommand::Open) => f.write_str("Opening failed"),
            Self::CommandFailed(GateCommand::Close) => f.write_str("Closing failed"),
            Self::Busy => f.write_str("Another operation is already in progress"),
        }
    }
}

/// The operation message shown for as long as a command is settling.
pub fn in_progress_message(command: GateCommand) -> String {
    match command {
        GateCommand::Open => "Opening in progress…".into(),
        GateCommand::Close => "Closing in progress…".into(),
    }
}
