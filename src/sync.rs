//! Synchronization of remote repositories into the IQ Server registry
//!
//! Processing is strictly sequential: one organization at a time, one
//! project at a time, one request in flight. Per-item failures become
//! error counts and the loop moves on; nothing here aborts a run.

use std::collections::HashMap;
use std::ops::AddAssign;

use crate::client::{ProjectHost, RepoSearch, ScanRegistry};
use crate::config::{GithubConfig, Organization, SyncConfig};
use crate::error::Result;
use crate::output::Reporter;

/// Label prefixing the owning department in Azure DevOps project
/// descriptions, e.g. `權責部門：財務部`
pub const DEPARTMENT_LABEL: &str = "權責部門";

/// Per-run counters for sync operations
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncCounts {
    pub created: u64,
    pub scanned: u64,
    pub errors: u64,
}

impl SyncCounts {
    fn one_error() -> Self {
        Self {
            errors: 1,
            ..Self::default()
        }
    }
}

impl AddAssign for SyncCounts {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.scanned += other.scanned;
        self.errors += other.errors;
    }
}

/// Outcome of one organization's sync pass
#[derive(Debug, Clone)]
pub struct OrgSyncOutcome {
    pub organization: String,
    pub counts: SyncCounts,
}

/// Total across per-organization outcomes
pub fn total_counts(outcomes: &[OrgSyncOutcome]) -> SyncCounts {
    let mut total = SyncCounts::default();
    for outcome in outcomes {
        total += outcome.counts;
    }
    total
}

/// Azure DevOps to IQ Server synchronization
pub struct Sync<'a> {
    host: &'a dyn ProjectHost,
    registry: &'a dyn ScanRegistry,
    config: &'a SyncConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> Sync<'a> {
    pub fn new(
        host: &'a dyn ProjectHost,
        registry: &'a dyn ScanRegistry,
        config: &'a SyncConfig,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            host,
            registry,
            config,
            reporter,
        }
    }

    /// Sync every organization, never failing fast; returns one outcome
    /// per organization in input order.
    pub async fn run(&self, orgs: &[Organization]) -> Vec<OrgSyncOutcome> {
        let mut outcomes = Vec::with_capacity(orgs.len());
        for (i, org) in orgs.iter().enumerate() {
            log::info!(
                "Processing organization [{}/{}]: {}",
                i + 1,
                orgs.len(),
                org.chinese_name
            );
            let counts = self.sync_org(org).await;
            outcomes.push(OrgSyncOutcome {
                organization: org.chinese_name.clone(),
                counts,
            });
        }
        outcomes
    }

    /// Sync one organization: match projects by description, create
    /// missing applications, trigger a scan for every matched project.
    pub async fn sync_org(&self, org: &Organization) -> SyncCounts {
        log::info!("Syncing organization: {} (ID: {})", org.chinese_name, org.id);

        let projects = match self.host.get_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                log::error!("Project listing failed for {}: {err}", org.chinese_name);
                return SyncCounts::one_error();
            }
        };

        let pattern = format!("{DEPARTMENT_LABEL}：{}", org.chinese_name);
        let matched: Vec<_> = projects
            .into_iter()
            .filter(|p| p.description.contains(&pattern))
            .collect();
        if matched.is_empty() {
            log::warn!(
                "No matching projects found for organization: {}",
                org.chinese_name
            );
            return SyncCounts::default();
        }

        let mut existing: HashMap<String, String> =
            match self.registry.get_applications(&org.id).await {
                Ok(apps) => apps.into_iter().map(|a| (a.name, a.id)).collect(),
                Err(err) => {
                    log::error!(
                        "Application listing failed for {}: {err}",
                        org.chinese_name
                    );
                    return SyncCounts::one_error();
                }
            };

        let branch = &self.config.default_branch;
        let mut counts = SyncCounts::default();

        self.reporter
            .begin(&format!("Syncing {}", org.chinese_name), matched.len() as u64);
        for project in &matched {
            log::info!("Processing project: {}", project.name);
            self.reporter.step(&project.name);

            let clone_url = match self.host.get_repo_url(&project.id).await {
                Ok(Some(url)) => url,
                Ok(None) => {
                    log::warn!("Repository URL not found for project: {}", project.name);
                    counts.errors += 1;
                    continue;
                }
                Err(err) => {
                    log::error!("Repository lookup failed for {}: {err}", project.name);
                    counts.errors += 1;
                    continue;
                }
            };

            let app_id = match existing.get(&project.name) {
                Some(id) => id.clone(),
                None => {
                    log::info!("Creating IQ application: {}", project.name);
                    match self
                        .registry
                        .create_application(&project.name, &clone_url, branch, &org.id)
                        .await
                    {
                        Ok(id) => {
                            counts.created += 1;
                            existing.insert(project.name.clone(), id.clone());
                            id
                        }
                        Err(err) => {
                            log::error!("Application creation failed for {}: {err}", project.name);
                            counts.errors += 1;
                            continue;
                        }
                    }
                }
            };

            log::info!("Initiating scan for application: {}", project.name);
            match self
                .registry
                .trigger_scan(&app_id, branch, &self.config.stage_id)
                .await
            {
                Ok(()) => counts.scanned += 1,
                Err(err) => {
                    log::error!("Scan trigger failed for {}: {err}", project.name);
                    counts.errors += 1;
                }
            }
        }
        self.reporter.finish();

        log::info!(
            "Summary for {}: {} applications created, {} scanned, {} errors.",
            org.chinese_name,
            counts.created,
            counts.scanned,
            counts.errors
        );
        counts
    }
}

/// GitHub search to IQ Server synchronization.
///
/// Unlike the Azure flow there is no organization loop; repositories are
/// discovered by a name search and synced into one registry organization.
/// Discovery and listing failures are fatal here, per-repository failures
/// are counted.
pub struct GithubSync<'a> {
    github: &'a dyn RepoSearch,
    registry: &'a dyn ScanRegistry,
    config: &'a GithubConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> GithubSync<'a> {
    pub fn new(
        github: &'a dyn RepoSearch,
        registry: &'a dyn ScanRegistry,
        config: &'a GithubConfig,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            github,
            registry,
            config,
            reporter,
        }
    }

    pub async fn run(&self) -> Result<SyncCounts> {
        log::info!(
            "Searching GitHub repositories matching '{}'",
            self.config.search_term
        );
        let login = self.github.current_login().await?;
        let repos = self
            .github
            .search_repositories(&self.config.search_term, &login)
            .await?;
        if repos.is_empty() {
            log::warn!(
                "No repositories found matching '{}'",
                self.config.search_term
            );
            return Ok(SyncCounts::default());
        }
        log::info!("Found {} repositories", repos.len());

        let org_id = &self.config.organization_id;
        let mut existing: HashMap<String, String> = self
            .registry
            .get_applications(org_id)
            .await?
            .into_iter()
            .map(|a| (a.name, a.id))
            .collect();

        let mut counts = SyncCounts::default();
        self.reporter.begin("Syncing repositories", repos.len() as u64);
        for repo in &repos {
            self.reporter.step(&repo.name);
            let branch = repo
                .default_branch
                .as_deref()
                .unwrap_or(&self.config.default_branch);

            let app_id = match existing.get(&repo.name) {
                Some(id) => id.clone(),
                None => {
                    log::info!("Creating IQ application: {}", repo.name);
                    match self
                        .registry
                        .create_application(&repo.name, &repo.clone_url, branch, org_id)
                        .await
                    {
                        Ok(id) => {
                            counts.created += 1;
                            existing.insert(repo.name.clone(), id.clone());
                            id
                        }
                        Err(err) => {
                            log::error!("Application creation failed for {}: {err}", repo.name);
                            counts.errors += 1;
                            continue;
                        }
                    }
                }
            };

            match self
                .registry
                .trigger_scan(&app_id, branch, &self.config.stage_id)
                .await
            {
                Ok(()) => counts.scanned += 1,
                Err(err) => {
                    log::error!("Scan trigger failed for {}: {err}", repo.name);
                    counts.errors += 1;
                }
            }
        }
        self.reporter.finish();

        log::info!(
            "Sync complete: {} created, {} scanned, {} errors.",
            counts.created,
            counts.scanned,
            counts.errors
        );
        Ok(counts)
    }
}
