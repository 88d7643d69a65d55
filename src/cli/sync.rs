//! `iqsync sync` command

use colored::Colorize;
use tabled::Tabled;

use crate::cli;
use crate::client::{AzureDevOpsClient, IqClient};
use crate::config::{self, SyncConfig};
use crate::error::Result;
use crate::output::{ConsoleReporter, table};
use crate::sync::{OrgSyncOutcome, Sync, total_counts};

/// Per-organization summary row
#[derive(Tabled)]
struct SyncRow {
    #[tabled(rename = "ORGANIZATION")]
    organization: String,

    #[tabled(rename = "CREATED")]
    created: u64,

    #[tabled(rename = "SCANNED")]
    scanned: u64,

    #[tabled(rename = "ERRORS")]
    errors: u64,
}

impl From<&OrgSyncOutcome> for SyncRow {
    fn from(outcome: &OrgSyncOutcome) -> Self {
        Self {
            organization: outcome.organization.clone(),
            created: outcome.counts.created,
            scanned: outcome.counts.scanned,
            errors: outcome.counts.errors,
        }
    }
}

/// Run the sync command
pub async fn run(org_file: Option<&str>, debug: bool) -> Result<()> {
    let config = SyncConfig::from_env()?;
    let orgs = config::load_organizations(&cli::org_file_path(org_file, debug))?;

    let azure = AzureDevOpsClient::new(
        &config.azure_base_url,
        &config.azure_organization,
        &config.azure_token,
    )?;
    let iq = IqClient::new(&config.iq_url, &config.iq_username, &config.iq_password)?;
    let reporter = ConsoleReporter::new();

    log::info!("Starting Azure DevOps to IQ Server synchronization.");
    let outcomes = Sync::new(&azure, &iq, &config, &reporter).run(&orgs).await;

    let rows: Vec<SyncRow> = outcomes.iter().map(SyncRow::from).collect();
    println!("{}", table::format_table(&rows));

    let total = total_counts(&outcomes);
    println!(
        "Total: {} created, {} scanned, {} errors",
        total.created, total.scanned, total.errors
    );
    if total.errors > 0 {
        println!(
            "{}",
            "Errors occurred during synchronization. See logs for details.".yellow()
        );
    } else {
        println!("{}", "Synchronization completed!".green());
    }

    Ok(())
}
