//! iqsync - Sync Azure DevOps and GitHub repositories into Sonatype IQ Server

use std::process::ExitCode;

use clap::Parser;

mod cleanup;
mod cli;
mod client;
mod config;
mod error;
mod output;
mod sync;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync => cli::sync::run(cli.org_file.as_deref(), cli.debug).await,
        Commands::Github => cli::github::run().await,
        Commands::Cleanup => cli::cleanup::run(cli.org_file.as_deref(), cli.debug).await,
        Commands::Version => {
            println!("iqsync version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
