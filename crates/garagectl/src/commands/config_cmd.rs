//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};
use secrecy::SecretString;

use garagectl_config::{Config, FileSettingsStore, TokenStorage};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the plaintext token.
fn format_config_redacted(cfg: &Config, token_resolved: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "url = \"{}\"", cfg.url);
    if cfg.token.is_some() {
        let _ = writeln!(out, "token = \"****\"");
    }
    if let Some(ref env) = cfg.token_env {
        let _ = writeln!(out, "token_env = \"{env}\"");
    }
    let _ = writeln!(out, "open_time_seconds = {}", cfg.open_time_seconds);
    let _ = writeln!(out, "close_time_seconds = {}", cfg.close_time_seconds);
    let _ = write!(
        out,
        "# token: {}",
        if token_resolved { "available" } else { "not configured" }
    );
    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn read_token(given: Option<String>) -> Result<String, CliError> {
    let token = match given {
        Some(t) => t,
        None => rpassword::prompt_password("Bearer token: ").map_err(prompt_err)?,
    };
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(token)
}

fn storage(plaintext: bool) -> TokenStorage {
    if plaintext {
        TokenStorage::Plaintext
    } else {
        TokenStorage::Keyring
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = garagectl_config::load_config(&path)?;
            let token_resolved = garagectl_config::resolve_token(&cfg).is_some();
            output::print_output(&format_config_redacted(&cfg, token_resolved), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let store = FileSettingsStore::open(&path)?;
            if key == "token" {
                tracing::warn!("storing the token in plaintext; prefer `garagectl config set-token`");
            }
            store.set_value(&key, &value)?;
            if !global.quiet {
                eprintln!("✓ {key} updated in {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::SetToken { token, plaintext } => {
            let store = FileSettingsStore::open(&path)?;
            let token = read_token(token)?;
            store.set_token(SecretString::from(token), storage(plaintext))?;
            if !global.quiet {
                let place = if plaintext { "config file" } else { "system keyring" };
                eprintln!("✓ token stored in {place}");
            }
            Ok(())
        }

        ConfigCommand::Init => init(&path),
    }
}

/// Interactive wizard: URL, token, settle times.
fn init(path: &std::path::Path) -> Result<(), CliError> {
    let store = FileSettingsStore::open(path)?;
    let current = store.config();

    eprintln!("garagectl configuration");
    eprintln!("   Config path: {}\n", path.display());

    let url: String = Input::new()
        .with_prompt("Gate controller URL")
        .default(if current.url.is_empty() {
            "http://192.168.1.50".to_owned()
        } else {
            current.url.clone()
        })
        .interact_text()
        .map_err(prompt_err)?;
    store.set_base_url(&url)?;

    let token = rpassword::prompt_password("Bearer token (empty keeps current): ")
        .map_err(prompt_err)?;
    if !token.trim().is_empty() {
        let choices = &[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let selection = Select::new()
            .with_prompt("Where to store the token?")
            .items(choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;
        store.set_token(
            SecretString::from(token.trim().to_owned()),
            storage(selection == 1),
        )?;
    }

    let open_secs: u32 = Input::new()
        .with_prompt("Seconds the gate takes to open")
        .default(current.open_time_seconds)
        .interact_text()
        .map_err(prompt_err)?;
    store.set_open_duration(open_secs)?;

    let close_secs: u32 = Input::new()
        .with_prompt("Seconds the gate takes to close")
        .default(current.close_time_seconds)
        .interact_text()
        .map_err(prompt_err)?;
    store.set_close_duration(close_secs)?;

    eprintln!("\n✓ Configuration saved to {}", path.display());
    Ok(())
}
