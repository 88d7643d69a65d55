//! `iqsync cleanup` command

use colored::Colorize;
use tabled::Tabled;

use crate::cleanup::{Cleanup, OrgCleanupOutcome, total_counts};
use crate::cli;
use crate::client::IqClient;
use crate::config::{self, CleanupConfig};
use crate::error::Result;
use crate::output::{ConsoleReporter, table};

/// Per-organization summary row
#[derive(Tabled)]
struct CleanupRow {
    #[tabled(rename = "ORGANIZATION")]
    organization: String,

    #[tabled(rename = "DELETED")]
    deleted: u64,

    #[tabled(rename = "ERRORS")]
    errors: u64,
}

impl From<&OrgCleanupOutcome> for CleanupRow {
    fn from(outcome: &OrgCleanupOutcome) -> Self {
        Self {
            organization: outcome.organization.clone(),
            deleted: outcome.counts.deleted,
            errors: outcome.counts.errors,
        }
    }
}

/// Run the cleanup command
pub async fn run(org_file: Option<&str>, debug: bool) -> Result<()> {
    let config = CleanupConfig::from_env()?;
    let orgs = config::load_organizations(&cli::org_file_path(org_file, debug))?;

    let iq = IqClient::new(&config.iq_url, &config.iq_username, &config.iq_password)?;
    let reporter = ConsoleReporter::new();

    log::info!("Starting IQ Server application cleanup.");
    let outcomes = Cleanup::new(&iq, &reporter).run(&orgs).await;

    let rows: Vec<CleanupRow> = outcomes.iter().map(CleanupRow::from).collect();
    println!("{}", table::format_table(&rows));

    let total = total_counts(&outcomes);
    println!("Total: {} deleted, {} errors", total.deleted, total.errors);
    if total.errors > 0 {
        println!(
            "{}",
            "Errors occurred during cleanup. See logs for details.".yellow()
        );
    } else {
        println!("{}", "Cleanup complete.".green());
    }

    Ok(())
}
