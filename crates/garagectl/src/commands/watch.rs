//! `garagectl watch`: run the poller and print each state change.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use owo_colors::OwoColorize;

use garagectl_core::{Controller, CoreError, DeviceClient, SettingsStore, ViewState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output::{self, StatusReport};

pub async fn handle(args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = config::open_store(global)?;
    if store.current().normalized_url().is_empty() {
        return Err(CliError::MissingUrl {
            path: config::config_path(global).display().to_string(),
        });
    }

    let client = DeviceClient::new(&config::transport(global)?).map_err(CoreError::from)?;
    let settings: Arc<dyn SettingsStore> = store.clone();
    let controller =
        Controller::with_poll_interval(client, settings, Duration::from_secs(args.interval));
    let color = output::should_color(global.color);

    let mut view = controller.view();
    controller.start().await;
    print_line(&store.current().normalized_url(), view.current(), global, color)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = view.changed() => match changed {
                Some(state) => print_line(&store.current().normalized_url(), &state, global, color)?,
                None => break,
            },
        }
    }

    controller.shutdown().await;
    Ok(())
}

fn print_line(
    url: &str,
    state: &ViewState,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            serde_json::to_string(&StatusReport::new(url.to_owned(), state))?
        }
        OutputFormat::Plain => state
            .last_status
            .as_ref()
            .map_or_else(|| "unknown".to_owned(), |s| s.status.clone()),
        OutputFormat::Table | OutputFormat::Yaml => text_line(state, color),
    };
    output::print_output(&line, global.quiet);
    Ok(())
}

fn text_line(state: &ViewState, color: bool) -> String {
    let dot = match (state.connected, color) {
        (true, true) => "●".green().to_string(),
        (false, true) => "●".red().to_string(),
        (true, false) => "●".into(),
        (false, false) => "○".into(),
    };
    let link = if state.connected { "connected" } else { "disconnected" };
    let summary = state.status_text().unwrap_or_else(|| "no status".into());

    let mut line = format!("{} {dot} {link:<12} {summary}", Local::now().format("%H:%M:%S"));
    if let Some(ref message) = state.operation_message {
        line.push_str("  ");
        line.push_str(message);
    }
    line
}
