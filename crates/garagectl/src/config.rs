//! CLI-side configuration: applies `GlobalOpts` on top of `garagectl-config`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use garagectl_config::FileSettingsStore;
use garagectl_core::TransportConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config` / `GARAGECTL_CONFIG`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(garagectl_config::config_path)
}

/// Open the settings store and layer `--url` / `--token` over it for this run.
pub fn open_store(global: &GlobalOpts) -> Result<Arc<FileSettingsStore>, CliError> {
    let store = FileSettingsStore::open(config_path(global))?;
    store.apply_overrides(
        global.url.clone(),
        global.token.clone().map(SecretString::from),
    );
    Ok(Arc::new(store))
}

pub fn transport(global: &GlobalOpts) -> Result<TransportConfig, CliError> {
    if global.timeout == 0 {
        return Err(CliError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(TransportConfig::default().with_timeout(Duration::from_secs(global.timeout)))
}
