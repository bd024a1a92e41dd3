//! Configuration for garagectl.
//!
//! A single TOML file plus `GARAGECTL_*` environment variables, token
//! resolution (env var → keyring → plaintext), and [`FileSettingsStore`],
//! the persistent [`SettingsStore`](garagectl_core::SettingsStore) used by
//! the CLI.

mod store;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use garagectl_core::Settings;
use garagectl_core::config::DEFAULT_DURATION_SECS;

pub use store::{FileSettingsStore, TokenStorage};

/// Keyring service name for the bearer token.
pub const KEYRING_SERVICE: &str = "garagectl";
/// Keyring user name for the bearer token.
pub const KEYRING_USER: &str = "token";
/// Prefix for environment overrides (`GARAGECTL_URL`, ...).
pub const ENV_PREFIX: &str = "GARAGECTL_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{0}' (expected url, token, token_env, open_time_seconds or close_time_seconds)")]
    UnknownKey(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// On-disk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Gate controller address, e.g. `192.168.1.50` or `http://gate.lan:8080`.
    #[serde(default)]
    pub url: String,

    /// Bearer token in plaintext. Prefer the keyring or `token_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Name of an environment variable holding the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default = "default_duration")]
    pub open_time_seconds: u32,

    #[serde(default = "default_duration")]
    pub close_time_seconds: u32,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            token_env: None,
            open_time_seconds: DEFAULT_DURATION_SECS,
            close_time_seconds: DEFAULT_DURATION_SECS,
        }
    }
}

impl Config {
    /// Set one key from its string form, as `garagectl config set` does.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let optional = |v: &str| (!v.trim().is_empty()).then(|| v.trim().to_owned());
        match key {
            "url" => self.url = value.trim().to_owned(),
            "token" => self.token = optional(value),
            "token_env" => self.token_env = optional(value),
            "open_time_seconds" => self.open_time_seconds = parse_seconds(key, value)?,
            "close_time_seconds" => self.close_time_seconds = parse_seconds(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_owned())),
        }
        Ok(())
    }

    /// Build runtime [`Settings`], resolving the token through the full chain
    /// with `vault` standing in for the keyring.
    ///
    /// A token that cannot be found anywhere becomes an empty one; the
    /// core reports that as missing configuration when it matters.
    pub fn to_settings(&self, vault: &dyn TokenVault) -> Settings {
        let env = |name: &str| std::env::var(name).ok();
        Settings {
            base_url: self.url.clone(),
            token: resolve_token_from(self, env, vault)
                .unwrap_or_else(|| SecretString::from(String::new())),
            open_duration_secs: self.open_time_seconds,
            close_duration_secs: self.close_time_seconds,
        }
    }
}

fn parse_seconds(field: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: field.to_owned(),
            reason: format!("expected a whole number of seconds, got '{value}'"),
        })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "garagectl", "garagectl").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("garagectl");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load config from `path` (missing file is fine) layered under
/// `GARAGECTL_*` environment variables.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).only(&[
            "url",
            "token_env",
            "open_time_seconds",
            "close_time_seconds",
        ]))
        .extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Token vault ─────────────────────────────────────────────────────

/// Secret storage that outranks the plaintext `token` entry.
pub trait TokenVault: Send + Sync + std::fmt::Debug {
    /// The stored token, if there is one.
    fn get(&self) -> Option<String>;

    fn store(&self, token: &str) -> Result<(), ConfigError>;

    /// Remove the stored token. Clearing an empty vault is not an error.
    fn clear(&self) -> Result<(), ConfigError>;
}

/// The OS keyring entry `garagectl`/`token`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeyring;

impl SystemKeyring {
    fn entry() -> Result<keyring::Entry, ConfigError> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
    }
}

impl TokenVault for SystemKeyring {
    fn get(&self) -> Option<String> {
        let entry = Self::entry().ok()?;
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                tracing::debug!(error = %e, "keyring lookup failed");
                None
            }
        }
    }

    fn store(&self, token: &str) -> Result<(), ConfigError> {
        Self::entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ConfigError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the bearer token: `token_env` → system keyring → plaintext.
pub fn resolve_token(cfg: &Config) -> Option<SecretString> {
    resolve_token_from(cfg, |name| std::env::var(name).ok(), &SystemKeyring)
}

fn resolve_token_from(
    cfg: &Config,
    env: impl Fn(&str) -> Option<String>,
    vault: &dyn TokenVault,
) -> Option<SecretString> {
    let non_blank = |s: String| (!s.trim().is_empty()).then_some(s);

    // 1. Named env var
    if let Some(val) = cfg.token_env.as_deref().and_then(&env).and_then(non_blank) {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(val) = vault.get().and_then(non_blank) {
        return Some(SecretString::from(val));
    }

    // 3. Plaintext in config
    cfg.token.clone().and_then(non_blank).map(SecretString::from)
}
