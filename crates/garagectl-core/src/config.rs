// ── Runtime device configuration ──
//
// What the core needs to talk to the gate. Never touches disk: the CLI
// (through garagectl-config) or a test builds a `Settings` and hands it
// to a `SettingsStore`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use garagectl_api::{GateCommand, normalize_base_url};

/// Default settle time after an open or close, in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Device address, credentials, and per-command settle times.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Device address as the user typed it. See [`normalized_url`](Self::normalized_url).
    pub base_url: String,
    /// Bearer token for open/close.
    pub token: SecretString,
    /// Seconds to wait after an accepted open before refreshing status.
    pub open_duration_secs: u32,
    /// Seconds to wait after an accepted close before refreshing status.
    pub close_duration_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: SecretString::from(String::new()),
            open_duration_secs: DEFAULT_DURATION_SECS,
            close_duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl Settings {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: SecretString::from(token.into()),
            ..Self::default()
        }
    }

    /// The base URL in normalized form; empty when unset.
    pub fn normalized_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }

    /// How long the gate is expected to travel for `command`.
    pub fn settle_duration(&self, command: GateCommand) -> Duration {
        let secs = match command {
            GateCommand::Open => self.open_duration_secs,
            GateCommand::Close => self.close_duration_secs,
        };
        Duration::from_secs(u64::from(secs))
    }
}
