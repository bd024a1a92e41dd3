//! `garagectl open` / `garagectl close`.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use garagectl_core::{
    CommandOutcome, Controller, GateCommand, Notice, NoticeLevel, SettingsStore,
};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::{self, StatusReport};

pub async fn handle(command: GateCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let store = config::open_store(global)?;
    let settings = store.current();
    let url = settings.normalized_url();
    if url.is_empty() {
        return Err(CliError::MissingUrl {
            path: config::config_path(global).display().to_string(),
        });
    }
    if !settings.has_token() {
        return Err(CliError::MissingToken);
    }

    let controller = Controller::connect(&config::transport(global)?, store)?;
    let mut notices = controller.notices();
    let color = output::should_color(global.color);
    let spinner = spinner(global.quiet);

    let issue = controller.issue_command(command);
    tokio::pin!(issue);
    let outcome = loop {
        tokio::select! {
            outcome = &mut issue => break outcome?,
            Ok(notice) = notices.recv() => show_notice(&notice, &spinner, global.quiet, color),
        }
    };
    spinner.finish_and_clear();

    match outcome {
        CommandOutcome::Completed { refreshed } => {
            if !refreshed {
                tracing::warn!("status refresh after {command} failed, showing last known state");
            }
            // Nothing else has polled this controller, so `connected` is still unset.
            controller.refresh().await;
            let report = StatusReport::new(url, &controller.snapshot());
            let rendered = output::render_status(global.output, &report, color)?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
        CommandOutcome::Rejected => Err(CliError::Rejected { command }),
        CommandOutcome::MissingConfiguration => Err(CliError::MissingToken),
        CommandOutcome::Busy => Err(CliError::Busy),
    }
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn show_notice(notice: &Notice, spinner: &ProgressBar, quiet: bool, color: bool) {
    match (notice, notice.level()) {
        (Notice::InProgress(command), _) => {
            spinner.set_message(garagectl_core::notice::in_progress_message(*command));
        }
        (_, NoticeLevel::Info) if quiet => {}
        (_, NoticeLevel::Error) if color => spinner.suspend(|| eprintln!("{}", notice.red())),
        (_, NoticeLevel::Warning) if color => {
            spinner.suspend(|| eprintln!("{}", notice.yellow()));
        }
        _ => spinner.suspend(|| eprintln!("{notice}")),
    }
}
