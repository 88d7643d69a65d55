//! `iqsync github` command

use colored::Colorize;

use crate::client::{GithubClient, IqClient};
use crate::config::GithubConfig;
use crate::error::Result;
use crate::output::ConsoleReporter;
use crate::sync::GithubSync;

/// Run the GitHub sync command
pub async fn run() -> Result<()> {
    let config = GithubConfig::from_env()?;

    let github = GithubClient::new(&config.github_api_url, &config.github_token)?;
    let iq = IqClient::new(&config.iq_url, &config.iq_username, &config.iq_password)?;
    let reporter = ConsoleReporter::new();

    log::info!("Starting GitHub to IQ Server synchronization.");
    let counts = GithubSync::new(&github, &iq, &config, &reporter).run().await?;

    println!(
        "Total: {} created, {} scanned, {} errors",
        counts.created, counts.scanned, counts.errors
    );
    if counts.errors > 0 {
        println!(
            "{}",
            "Errors occurred during synchronization. See logs for details.".yellow()
        );
    } else {
        println!("{}", "Synchronization completed!".green());
    }

    Ok(())
}
