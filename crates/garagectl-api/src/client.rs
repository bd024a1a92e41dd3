// Device API HTTP client
//
// Wraps `reqwest::Client` with the gate controller's four endpoints.
// The client holds no device state: every call takes the base URL, so a
// settings change takes effect on the very next request.

use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::base_url::endpoint;
use crate::error::Error;
use crate::model::{GateCommand, GateStatus};
use crate::transport::TransportConfig;

/// HTTP client for a gate controller.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
}

impl DeviceClient {
    /// Create a client whose requests obey the deadlines in `transport`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    // ── Fallible operations ──────────────────────────────────────────

    /// `GET {base}/health`. Succeeds only on exactly HTTP 200.
    pub async fn try_check_health(&self, base_url: &str) -> Result<(), Error> {
        let resp = self.get(endpoint(base_url, "health")?, None).await?;
        let status = resp.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
            })
        }
    }

    /// `GET {base}/gate/status`, decoded into a [`GateStatus`].
    pub async fn try_fetch_status(&self, base_url: &str) -> Result<GateStatus, Error> {
        let resp = self.get(endpoint(base_url, "gate/status")?, None).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// `GET {base}/gate/open` or `GET {base}/gate/close` with a bearer token.
    /// Any 2xx counts as accepted.
    pub async fn try_send_command(
        &self,
        base_url: &str,
        token: &SecretString,
        command: GateCommand,
    ) -> Result<(), Error> {
        let resp = self
            .get(endpoint(base_url, command.path())?, Some(token))
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
            })
        }
    }

    // ── Collapsed operations ─────────────────────────────────────────

    /// `true` iff the device answered `/health` with HTTP 200.
    pub async fn check_health(&self, base_url: &str) -> bool {
        match self.try_check_health(base_url).await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }

    /// The current gate status, or `None` on any failure.
    pub async fn fetch_status(&self, base_url: &str) -> Option<GateStatus> {
        match self.try_fetch_status(base_url).await {
            Ok(status) => Some(status),
            Err(e) => {
                debug!(error = %e, "status fetch failed");
                None
            }
        }
    }

    /// `true` iff the device accepted the command.
    pub async fn send_command(
        &self,
        base_url: &str,
        token: &SecretString,
        command: GateCommand,
    ) -> bool {
        match self.try_send_command(base_url, token, command).await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, %command, "gate command failed");
                false
            }
        }
    }

    pub async fn open_gate(&self, base_url: &str, token: &SecretString) -> bool {
        self.send_command(base_url, token, GateCommand::Open).await
    }

    pub async fn close_gate(&self, base_url: &str, token: &SecretString) -> bool {
        self.send_command(base_url, token, GateCommand::Close).await
    }

    // ── Request helper ───────────────────────────────────────────────

    async fn get(&self, url: Url, token: Option<&SecretString>) -> Result<reqwest::Response, Error> {
        debug!("GET {}", url);

        let mut req = self.http.get(url).header(ACCEPT, "application/json");
        if let Some(token) = token {
            req = req.bearer_auth(token.expose_secret());
        }

        req.send().await.map_err(Error::Transport)
    }
}
