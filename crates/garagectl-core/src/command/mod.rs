// ── Command coordinator ──
//
// Runs one open/close at a time: send the command, hold the view in
// "operating" for the configured settle time, then refresh the status.
// The poller keeps running meanwhile; whichever writes last wins.

mod guard;

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

use garagectl_api::GateCommand;

use crate::api::DeviceApi;
use crate::notice::{Notice, in_progress_message};
use crate::settings::SettingsStore;
use crate::store::ViewStore;

use self::guard::OperationGuard;

/// How a call to [`CommandCoordinator::issue`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The device accepted the command and the settle period elapsed.
    /// `refreshed` tells whether the follow-up status fetch succeeded.
    Completed { refreshed: bool },
    /// The device refused the command or could not be reached.
    Rejected,
    /// Base URL or token is blank; nothing was sent.
    MissingConfiguration,
    /// Another command was still running; nothing was sent.
    Busy,
}

impl CommandOutcome {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Serializes user commands against each other and writes the
/// `operating` half of the view state.
pub struct CommandCoordinator<A> {
    api: Arc<A>,
    view: Arc<ViewStore>,
    settings: Arc<dyn SettingsStore>,
    notices: broadcast::Sender<Notice>,
    in_flight: Arc<Mutex<()>>,
}

impl<A> Clone for CommandCoordinator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            view: Arc::clone(&self.view),
            settings: Arc::clone(&self.settings),
            notices: self.notices.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<A: DeviceApi> CommandCoordinator<A> {
    pub fn new(
        api: Arc<A>,
        view: Arc<ViewStore>,
        settings: Arc<dyn SettingsStore>,
        notices: broadcast::Sender<Notice>,
    ) -> Self {
        Self {
            api,
            view,
            settings,
            notices,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// `true` while a command is between acceptance and cleanup.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run `command` to completion.
    ///
    /// Settings are read once, up front; changes made while the gate is
    /// settling apply to the next command only. Whatever happens after
    /// the device accepts, `operating` is cleared on the way out.
    pub async fn issue(&self, command: GateCommand) -> CommandOutcome {
        let Ok(_permit) = self.in_flight.try_lock() else {
            debug!(%command, "command ignored, another one is in flight");
            self.notify(Notice::Busy);
            return CommandOutcome::Busy;
        };

        let settings = self.settings.current();
        let base_url = settings.normalized_url();
        if base_url.is_empty() || !settings.has_token() {
            self.notify(Notice::MissingConfiguration);
            return CommandOutcome::MissingConfiguration;
        }

        if !self
            .api
            .send_command(&base_url, &settings.token, command)
            .await
        {
            warn!(%command, url = %base_url, "device did not accept command");
            self.notify(Notice::CommandFailed(command));
            return CommandOutcome::Rejected;
        }

        let _operation = OperationGuard::begin(&self.view, in_progress_message(command));
        self.notify(Notice::InProgress(command));

        let settle = settings.settle_duration(command);
        info!(%command, settle_secs = settle.as_secs(), "command accepted, waiting for gate");
        tokio::time::sleep(settle).await;

        let refreshed = match self.api.fetch_status(&base_url).await {
            Some(status) => {
                self.view.replace_status(status);
                true
            }
            None => false,
        };
        info!(%command, refreshed, "command completed");

        CommandOutcome::Completed { refreshed }
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine: notices are fire-and-forget.
        let _ = self.notices.send(notice);
    }
}
