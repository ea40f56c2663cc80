//! unvar CLI - rewrites JavaScript var declarations into let and const

mod cli;
mod commands;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use commands::Commands;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli);

    tracing::debug!(command = ?cli.command, "starting");

    match &cli.command {
        Commands::Fix(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}
