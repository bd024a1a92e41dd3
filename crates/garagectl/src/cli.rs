//! Clap derive structures for the `garagectl` CLI.
//!
//! Only depends on clap and clap_complete so `build.rs` can include it
//! to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// garagectl -- open, close, and watch a network-attached gate
#[derive(Debug, Parser)]
#[command(
    name = "garagectl",
    version,
    about = "Open, close, and monitor a network-attached gate controller",
    long_about = "Talks to a gate controller's HTTP API: polls /health and /gate/status,\n\
        sends authenticated open/close commands, and reports the reconciled state.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "GARAGECTL_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Gate controller URL (overrides the config file for this run)
    #[arg(long, short = 'u', env = "GARAGECTL_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token for open/close (overrides the config file for this run)
    #[arg(long, env = "GARAGECTL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GARAGECTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Request timeout in seconds
    #[arg(long, env = "GARAGECTL_TIMEOUT", default_value = "15", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the controller once and print connection and gate status
    #[command(alias = "st")]
    Status,

    /// Open the gate and wait for it to settle
    Open,

    /// Close the gate and wait for it to settle
    Close,

    /// Poll continuously and print every state change (Ctrl-C to stop)
    Watch(WatchArgs),

    /// Manage the configuration file and stored token
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls
    #[arg(long, short = 'i', default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (token redacted)
    Show,

    /// Print the config file path
    Path,

    /// Interactive setup: URL, token, and settle times
    Init,

    /// Set one key: url, token_env, open_time_seconds, close_time_seconds
    Set {
        /// Config key
        key: String,
        /// New value (empty string clears optional keys)
        value: String,
    },

    /// Store the bearer token (prompted if not given)
    SetToken {
        /// Token value; read from a hidden prompt when omitted
        token: Option<String>,

        /// Write the token into the config file instead of the system keyring
        #[arg(long)]
        plaintext: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
