// Shared transport configuration for building reqwest::Client instances.
//
// A hung gate controller must never block the poller or a command, so
// every client carries connect, read, and whole-call deadlines.

use std::time::Duration;

use crate::error::Error;

/// Timeouts and identity for the HTTP client talking to the device.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect deadline.
    pub connect_timeout: Duration,
    /// Deadline between reads of the response.
    pub read_timeout: Duration,
    /// Deadline for the whole call, connect through body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(15),
            user_agent: concat!("garagectl/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::Client(e.to_string()))
    }

    /// Override the whole-call deadline, clamping the connect and read
    /// deadlines so neither exceeds it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self.read_timeout = self.read_timeout.min(timeout);
        self
    }
}
