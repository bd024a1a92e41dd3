//! Output formatting: table, JSON, YAML, plain.
//!
//! Status reports render as a two-column table by default; structured
//! formats serialize the same report with serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use garagectl_core::{GateStatus, ViewState};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Status report ────────────────────────────────────────────────────

/// What `status`, `open`, and `close` print.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub url: String,
    pub connected: bool,
    pub summary: Option<String>,
    pub can_open: bool,
    pub can_close: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_polled: Option<chrono::DateTime<chrono::Utc>>,
}

impl StatusReport {
    pub fn new(url: String, view: &ViewState) -> Self {
        Self {
            url,
            connected: view.connected,
            summary: view.status_text(),
            can_open: view.can_open(),
            can_close: view.can_close(),
            gate: view.last_status.clone(),
            last_polled: view.last_polled,
        }
    }
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(field: &'static str, value: impl ToString) -> DetailRow {
    DetailRow {
        field,
        value: value.to_string(),
    }
}

fn optional_secs(value: Option<u64>) -> String {
    value.map_or_else(|| "-".into(), |s| format!("{s}s"))
}

fn status_table(report: &StatusReport, color: bool) -> String {
    let connected = match (report.connected, color) {
        (true, true) => "yes".green().to_string(),
        (false, true) => "no".red().to_string(),
        (true, false) => "yes".into(),
        (false, false) => "no".into(),
    };

    let mut rows = vec![
        row("Controller", &report.url),
        row("Connected", connected),
        row(
            "Gate",
            report.summary.as_deref().unwrap_or("no status received"),
        ),
    ];
    if let Some(ref gate) = report.gate {
        rows.extend([
            row("Sensor closed", gate.sensor_closed),
            row("Sensor open", gate.sensor_open),
            row("Alert", gate.alert_active),
            row("Auto-close", gate.auto_close_enabled),
            row("Operation time", optional_secs(gate.operation_time)),
            row("Timeout remaining", optional_secs(gate.timeout_remaining)),
            row("Auto-close time", optional_secs(gate.auto_close_time)),
            row("Auto-close remaining", optional_secs(gate.auto_close_remaining)),
        ]);
    }
    rows.push(row(
        "Actions",
        match (report.can_open, report.can_close) {
            (true, true) => "open, close",
            (true, false) => "open",
            (false, true) => "close",
            (false, false) => "none",
        },
    ));

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render a status report in the chosen format.
pub fn render_status(
    format: OutputFormat,
    report: &StatusReport,
    color: bool,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => status_table(report, color),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::JsonCompact => serde_json::to_string(report)?,
        OutputFormat::Yaml => serde_yaml::to_string(report)?,
        OutputFormat::Plain => report
            .gate
            .as_ref()
            .map_or_else(|| "unknown".to_owned(), |g| g.status.clone()),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report(status: Option<&str>) -> StatusReport {
        let view = ViewState {
            connected: true,
            last_status: status.map(GateStatus::with_status),
            ..ViewState::default()
        };
        StatusReport::new("http://gate.lan".into(), &view)
    }

    #[test]
    fn plain_prints_raw_status() {
        let out = render_status(OutputFormat::Plain, &report(Some("closing")), false).unwrap();
        assert_eq!(out, "closing");
        let out = render_status(OutputFormat::Plain, &report(None), false).unwrap();
        assert_eq!(out, "unknown");
    }

    #[test]
    fn json_carries_gate_fields() {
        let out = render_status(OutputFormat::JsonCompact, &report(Some("open")), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["gate"]["status"], "open");
        assert_eq!(value["summary"], "Gate: open");
        assert_eq!(value["can_open"], false);
        assert_eq!(value["can_close"], true);
    }

    #[test]
    fn table_without_status_says_so() {
        let out = render_status(OutputFormat::Table, &report(None), false).unwrap();
        assert!(out.contains("no status received"));
        assert!(out.contains("open, close"));
    }
}
