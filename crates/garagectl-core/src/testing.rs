// Scriptable in-memory gate controller for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use secrecy::SecretString;

use garagectl_api::{GateCommand, GateStatus};

use crate::api::DeviceApi;

/// How the fake answers for one base URL.
#[derive(Debug, Clone, Default)]
pub(crate) struct Endpoint {
    pub healthy: bool,
    pub status: Option<GateStatus>,
    pub accepts_commands: bool,
    /// Delay before every answer.
    pub latency: Duration,
    pub panic_on_health: bool,
    pub panic_on_status: bool,
}

impl Endpoint {
    pub fn online(status: &str) -> Self {
        Self {
            healthy: true,
            status: Some(GateStatus::with_status(status)),
            accepts_commands: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Health(String),
    Status(String),
    Command(String, GateCommand),
}

#[derive(Debug, Default)]
pub(crate) struct FakeDevice {
    endpoints: Mutex<HashMap<String, Endpoint>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDevice {
    pub fn with(base_url: &str, endpoint: Endpoint) -> Self {
        let fake = Self::default();
        fake.set(base_url, endpoint);
        fake
    }

    pub fn set(&self, base_url: &str, endpoint: Endpoint) {
        self.endpoints
            .lock()
            .unwrap()
            .insert(base_url.to_owned(), endpoint);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn answer(&self, call: Call, base_url: &str) -> Endpoint {
        self.calls.lock().unwrap().push(call);
        self.endpoints
            .lock()
            .unwrap()
            .get(base_url)
            .cloned()
            .unwrap_or_default()
    }
}

impl DeviceApi for FakeDevice {
    async fn check_health(&self, base_url: &str) -> bool {
        let ep = self.answer(Call::Health(base_url.to_owned()), base_url);
        tokio::time::sleep(ep.latency).await;
        assert!(!ep.panic_on_health, "health check exploded");
        ep.healthy
    }

    async fn fetch_status(&self, base_url: &str) -> Option<GateStatus> {
        let ep = self.answer(Call::Status(base_url.to_owned()), base_url);
        tokio::time::sleep(ep.latency).await;
        assert!(!ep.panic_on_status, "status fetch exploded");
        ep.status
    }

    async fn send_command(
        &self,
        base_url: &str,
        _token: &SecretString,
        command: GateCommand,
    ) -> bool {
        let ep = self.answer(Call::Command(base_url.to_owned(), command), base_url);
        tokio::time::sleep(ep.latency).await;
        ep.accepts_commands
    }
}
