//! Command dispatch.

pub mod config_cmd;
pub mod gate;
pub mod status;
pub mod watch;

use clap::CommandFactory;

use garagectl_core::GateCommand;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(global).await,
        Command::Open => gate::handle(GateCommand::Open, global).await,
        Command::Close => gate::handle(GateCommand::Close, global).await,
        Command::Watch(args) => watch::handle(&args, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "garagectl", &mut std::io::stdout());
            Ok(())
        }
    }
}
