//! `garagectl status`: one health + status cycle.

use garagectl_core::{Controller, SettingsStore};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::{self, StatusReport};

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let store = config::open_store(global)?;
    let url = store.current().normalized_url();
    if url.is_empty() {
        return Err(CliError::MissingUrl {
            path: config::config_path(global).display().to_string(),
        });
    }

    let controller = Controller::connect(&config::transport(global)?, store)?;
    controller.probe().await?;

    let report = StatusReport::new(url, &controller.snapshot());
    let rendered =
        output::render_status(global.output, &report, output::should_color(global.color))?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
