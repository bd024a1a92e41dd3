// ── Device API seam ──
//
// The poller and coordinator are generic over `DeviceApi` so they can be
// driven by a fake device in tests. The contract is the collapsed one:
// every failure is already `false` / `None` by the time it gets here.

use std::future::Future;

use secrecy::SecretString;

use garagectl_api::{DeviceClient, GateCommand, GateStatus};

/// The four gate controller operations, infallible by contract.
pub trait DeviceApi: Send + Sync + 'static {
    /// `true` iff `/health` answered HTTP 200.
    fn check_health(&self, base_url: &str) -> impl Future<Output = bool> + Send;

    /// The reported gate status, or `None` on any failure.
    fn fetch_status(&self, base_url: &str) -> impl Future<Output = Option<GateStatus>> + Send;

    /// `true` iff the device accepted the command.
    fn send_command(
        &self,
        base_url: &str,
        token: &SecretString,
        command: GateCommand,
    ) -> impl Future<Output = bool> + Send;
}

impl DeviceApi for DeviceClient {
    async fn check_health(&self, base_url: &str) -> bool {
        DeviceClient::check_health(self, base_url).await
    }

    async fn fetch_status(&self, base_url: &str) -> Option<GateStatus> {
        DeviceClient::fetch_status(self, base_url).await
    }

    async fn send_command(
        &self,
        base_url: &str,
        token: &SecretString,
        command: GateCommand,
    ) -> bool {
        DeviceClient::send_command(self, base_url, token, command).await
    }
}
