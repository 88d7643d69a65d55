//! Bulk deletion of IQ Server applications per organization
//!
//! Cleanup deliberately targets every application in an organization, not
//! the subset Sync would have matched; it is the inverse of repeated sync
//! runs, including manually created entries.

use std::ops::AddAssign;

use crate::client::ScanRegistry;
use crate::config::Organization;
use crate::output::Reporter;

/// Per-run counters for cleanup operations
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupCounts {
    pub deleted: u64,
    pub errors: u64,
}

impl AddAssign for CleanupCounts {
    fn add_assign(&mut self, other: Self) {
        self.deleted += other.deleted;
        self.errors += other.errors;
    }
}

/// Outcome of one organization's cleanup pass
#[derive(Debug, Clone)]
pub struct OrgCleanupOutcome {
    pub organization: String,
    pub counts: CleanupCounts,
}

/// Total across per-organization outcomes
pub fn total_counts(outcomes: &[OrgCleanupOutcome]) -> CleanupCounts {
    let mut total = CleanupCounts::default();
    for outcome in outcomes {
        total += outcome.counts;
    }
    total
}

/// IQ Server application cleanup
pub struct Cleanup<'a> {
    registry: &'a dyn ScanRegistry,
    reporter: &'a dyn Reporter,
}

impl<'a> Cleanup<'a> {
    pub fn new(registry: &'a dyn ScanRegistry, reporter: &'a dyn Reporter) -> Self {
        Self { registry, reporter }
    }

    /// Clean every organization, never failing fast
    pub async fn run(&self, orgs: &[Organization]) -> Vec<OrgCleanupOutcome> {
        let mut outcomes = Vec::with_capacity(orgs.len());
        for (i, org) in orgs.iter().enumerate() {
            log::info!(
                "Processing organization [{}/{}]: {}",
                i + 1,
                orgs.len(),
                org.chinese_name
            );
            let counts = self.cleanup_org(org).await;
            outcomes.push(OrgCleanupOutcome {
                organization: org.chinese_name.clone(),
                counts,
            });
        }
        outcomes
    }

    /// Delete every application in one organization
    pub async fn cleanup_org(&self, org: &Organization) -> CleanupCounts {
        log::info!("Cleaning organization: {} (ID: {})", org.chinese_name, org.id);

        let apps = match self.registry.get_applications(&org.id).await {
            Ok(apps) => apps,
            Err(err) => {
                log::error!(
                    "Application listing failed for {}: {err}",
                    org.chinese_name
                );
                return CleanupCounts {
                    deleted: 0,
                    errors: 1,
                };
            }
        };
        if apps.is_empty() {
            log::warn!("No applications found for organization: {}", org.chinese_name);
            return CleanupCounts::default();
        }

        let mut counts = CleanupCounts::default();
        self.reporter
            .begin(&format!("Deleting from {}", org.chinese_name), apps.len() as u64);
        for app in &apps {
            self.reporter.step(&app.name);
            match self.registry.delete_application(&app.id).await {
                Ok(()) => {
                    log::debug!("Deleted application: {}", app.name);
                    counts.deleted += 1;
                }
                Err(err) => {
                    log::error!("Failed to delete application {}: {err}", app.name);
                    counts.errors += 1;
                }
            }
        }
        self.reporter.finish();

        log::info!(
            "Summary for {}: {} applications deleted, {} errors.",
            org.chinese_name,
            counts.deleted,
            counts.errors
        );
        counts
    }
}
