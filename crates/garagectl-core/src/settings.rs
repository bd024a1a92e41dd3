// ── Settings store ──
//
// The core only ever reads settings. Writers (the config crate, tests)
// publish a new `Settings` through a `watch` channel and every reader
// sees it on its next operation.

use secrecy::SecretString;
use tokio::sync::watch;

use crate::config::Settings;

/// Source of [`Settings`] with change notification.
///
/// Object safe so the controller can hold any implementation behind
/// `Arc<dyn SettingsStore>`.
pub trait SettingsStore: Send + Sync {
    /// Subscribe to settings changes. The receiver starts at the current value.
    fn subscribe(&self) -> watch::Receiver<Settings>;

    /// The settings as of right now.
    fn current(&self) -> Settings {
        self.subscribe().borrow().clone()
    }
}

/// In-process settings with no persistence.
#[derive(Debug)]
pub struct MemorySettingsStore {
    tx: watch::Sender<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        let (tx, _) = watch::channel(settings);
        Self { tx }
    }

    pub fn set_base_url(&self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        self.tx.send_if_modified(|s| {
            if s.base_url == base_url {
                return false;
            }
            s.base_url = base_url;
            true
        });
    }

    pub fn set_token(&self, token: SecretString) {
        self.tx.send_modify(|s| s.token = token);
    }

    pub fn set_open_duration(&self, secs: u32) {
        self.tx.send_if_modified(|s| {
            let changed = s.open_duration_secs != secs;
            s.open_duration_secs = secs;
            changed
        });
    }

    pub fn set_close_duration(&self, secs: u32) {
        self.tx.send_if_modified(|s| {
            let changed = s.close_duration_secs != secs;
            s.close_duration_secs = secs;
            changed
        });
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }
}
