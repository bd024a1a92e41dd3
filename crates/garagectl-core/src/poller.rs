// ── Status poller ──
//
// One supervisor task follows the settings channel. For each base URL it
// spawns a poll loop; when the URL changes the loop is cancelled and
// joined before the next one starts, so a stale configuration can never
// write into the view state.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use garagectl_api::normalize_base_url;

use crate::api::DeviceApi;
use crate::config::Settings;
use crate::store::ViewStore;

/// How often the device is polled.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Periodic health + status checker.
pub struct Poller<A> {
    api: Arc<A>,
    view: Arc<ViewStore>,
    interval: Duration,
}

impl<A: DeviceApi> Poller<A> {
    pub fn new(api: Arc<A>, view: Arc<ViewStore>) -> Self {
        Self::with_interval(api, view, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(api: Arc<A>, view: Arc<ViewStore>, interval: Duration) -> Self {
        Self {
            api,
            view,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Run a single poll cycle against `raw_url`.
    ///
    /// A blank URL marks the device disconnected without any request. A
    /// panic anywhere in the cycle is contained and also counts as
    /// disconnected.
    pub async fn poll_once(&self, raw_url: &str) {
        let base_url = normalize_base_url(raw_url);
        if base_url.is_empty() {
            debug!("no device URL configured, skipping poll");
            self.view.record_health(false);
            return;
        }

        let cycle = AssertUnwindSafe(self.run_cycle(&base_url)).catch_unwind();
        if cycle.await.is_err() {
            warn!(url = %base_url, "poll cycle panicked, marking device disconnected");
            self.view.record_health(false);
        }
    }

    async fn run_cycle(&self, base_url: &str) {
        let healthy = self.api.check_health(base_url).await;
        debug!(url = %base_url, healthy, "health check");
        self.view.record_health(healthy);

        // A failed fetch keeps the previous status on screen.
        if let Some(status) = self.api.fetch_status(base_url).await {
            debug!(url = %base_url, status = %status.status, "status fetched");
            self.view.replace_status(status);
        }
    }

    /// Spawn the supervisor. Polling follows `settings` until `cancel` fires.
    pub fn spawn(
        self: Arc<Self>,
        settings: watch::Receiver<Settings>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(supervise(self, settings, cancel))
    }
}

async fn supervise<A: DeviceApi>(
    poller: Arc<Poller<A>>,
    mut settings: watch::Receiver<Settings>,
    cancel: CancellationToken,
) {
    loop {
        let raw_url = settings.borrow_and_update().base_url.clone();
        info!(url = %normalize_base_url(&raw_url), "starting status poller");

        let loop_cancel = cancel.child_token();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&poller),
            raw_url.clone(),
            loop_cancel.clone(),
        ));

        let restart = wait_for_url_change(&mut settings, &raw_url, &cancel).await;

        loop_cancel.cancel();
        if let Err(e) = handle.await {
            warn!(error = %e, "poll loop ended abnormally");
        }

        if !restart {
            break;
        }
        debug!("device URL changed, restarting poller");
    }
    debug!("status poller stopped");
}

/// Wait until the base URL differs from `current` (`true`) or the poller
/// is shut down (`false`). Other settings changes are ignored.
async fn wait_for_url_change(
    settings: &mut watch::Receiver<Settings>,
    current: &str,
    cancel: &CancellationToken,
) -> bool {
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => return false,

            changed = settings.changed() => {
                if changed.is_err() {
                    // Store dropped: keep polling the last URL until shutdown.
                    cancel.cancelled().await;
                    return false;
                }
                if settings.borrow_and_update().base_url != current {
                    return true;
                }
            }
        }
    }
}

async fn poll_loop<A: DeviceApi>(poller: Arc<Poller<A>>, raw_url: String, cancel: CancellationToken) {
    let run = async {
        loop {
            poller.poll_once(&raw_url).await;
            tokio::time::sleep(poller.interval).await;
        }
    };

    // Dropping `run` abandons any request in flight along with its writes.
    tokio::select! {
        biased;
        () = cancel.cancelled() => {}
        _ = run => {}
    }
}
