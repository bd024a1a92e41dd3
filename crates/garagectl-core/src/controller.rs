// ── Controller ──
//
// Lifecycle facade over the poller and the command coordinator. Owns the
// shared view store, the notice channel, and the background poll task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use garagectl_api::{DeviceClient, GateCommand, GateStatus, TransportConfig};

use crate::api::DeviceApi;
use crate::command::{CommandCoordinator, CommandOutcome};
use crate::config::Settings;
use crate::error::CoreError;
use crate::notice::Notice;
use crate::poller::{DEFAULT_POLL_INTERVAL, Poller};
use crate::settings::SettingsStore;
use crate::store::{ViewState, ViewStore};
use crate::stream::ViewStream;

const NOTICE_CHANNEL_SIZE: usize = 32;

/// The main entry point for consumers.
///
/// Cheaply cloneable. Nothing runs until [`start()`](Self::start); a
/// controller that is never started can still issue commands and run
/// one-off refreshes, which is what the CLI does.
pub struct Controller<A = DeviceClient> {
    inner: Arc<ControllerInner<A>>,
}

struct ControllerInner<A> {
    view: Arc<ViewStore>,
    settings: Arc<dyn SettingsStore>,
    notices: broadcast::Sender<Notice>,
    poller: Arc<Poller<A>>,
    commands: CommandCoordinator<A>,
    cancel: CancellationToken,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl<A> Clone for Controller<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: DeviceApi> Controller<A> {
    pub fn new(api: A, settings: Arc<dyn SettingsStore>) -> Self {
        Self::with_poll_interval(api, settings, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        api: A,
        settings: Arc<dyn SettingsStore>,
        interval: Duration,
    ) -> Self {
        let api = Arc::new(api);
        let view = Arc::new(ViewStore::new());
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);

        let poller = Arc::new(Poller::with_interval(
            Arc::clone(&api),
            Arc::clone(&view),
            interval,
        ));
        let commands = CommandCoordinator::new(
            api,
            Arc::clone(&view),
            Arc::clone(&settings),
            notices.clone(),
        );

        Self {
            inner: Arc::new(ControllerInner {
                view,
                settings,
                notices,
                poller,
                commands,
                cancel: CancellationToken::new(),
                poll_task: Mutex::new(None),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start background polling. Calling it again while running is a no-op.
    pub async fn start(&self) {
        let mut task = self.inner.poll_task.lock().await;
        if task.is_some() || self.inner.cancel.is_cancelled() {
            debug!("poller already started");
            return;
        }
        info!(interval_secs = self.inner.poller.interval().as_secs(), "starting controller");
        *task = Some(Arc::clone(&self.inner.poller).spawn(
            self.inner.settings.subscribe(),
            self.inner.cancel.child_token(),
        ));
    }

    /// Stop polling and wait for the poll task to exit.
    ///
    /// A command already accepted by the device keeps running to
    /// completion on its own task.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.poll_task.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "poller task ended abnormally");
            }
        }
        debug!("controller shut down");
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to the reconciled view state.
    pub fn view(&self) -> ViewStream {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.view.snapshot()
    }

    /// Subscribe to transient user-facing notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    pub fn settings(&self) -> Settings {
        self.inner.settings.current()
    }

    /// `true` while an open or close is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.commands.is_busy()
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Run one poll cycle against the current settings, now.
    pub async fn refresh(&self) {
        let raw_url = self.inner.settings.current().base_url;
        self.inner.poller.poll_once(&raw_url).await;
    }

    /// Issue an open or close and wait for it to finish.
    ///
    /// The command runs on its own task: dropping the returned future
    /// stops the wait, not the command.
    pub async fn issue_command(&self, command: GateCommand) -> Result<CommandOutcome, CoreError> {
        let commands = self.inner.commands.clone();
        tokio::spawn(async move { commands.issue(command).await })
            .await
            .map_err(|e| CoreError::Internal(format!("{command} task failed: {e}")))
    }

    pub async fn open(&self) -> Result<CommandOutcome, CoreError> {
        self.issue_command(GateCommand::Open).await
    }

    pub async fn close(&self) -> Result<CommandOutcome, CoreError> {
        self.issue_command(GateCommand::Close).await
    }
}

impl Controller<DeviceClient> {
    /// Controller talking HTTP to a real device.
    pub fn connect(
        transport: &TransportConfig,
        settings: Arc<dyn SettingsStore>,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(DeviceClient::new(transport)?, settings))
    }

    /// Health check and status fetch that report *why* they failed.
    ///
    /// The results are applied to the view state exactly like a poll
    /// cycle would apply them.
    pub async fn probe(&self) -> Result<GateStatus, CoreError> {
        let base_url = self.inner.settings.current().normalized_url();
        if base_url.is_empty() {
            self.inner.view.record_health(false);
            return Err(CoreError::MissingConfiguration { what: "device URL" });
        }
        let client = self.inner.poller.api();

        let health = client.try_check_health(&base_url).await;
        self.inner.view.record_health(health.is_ok());
        health.map_err(|e| CoreError::from_device(&base_url, e))?;

        let status = client
            .try_fetch_status(&base_url)
            .await
            .map_err(|e| CoreError::from_device(&base_url, e))?;
        self.inner.view.replace_status(status.clone());
        Ok(status)
    }
}
