//! REST clients for the IQ Server registry and the source-hosting platforms

use async_trait::async_trait;

use crate::error::Result;

pub mod azure;
pub mod github;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;

mod iq;

pub use azure::AzureDevOpsClient;
pub use github::GithubClient;
pub use iq::IqClient;
pub use models::{RegistryApplication, RemoteProject, RemoteRepo};

/// Operations against the IQ Server application registry.
///
/// Listing returns `Ok` with an empty vector when the organization simply
/// has no applications; a failed call is `Err`. The two cases are never
/// conflated.
#[async_trait]
pub trait ScanRegistry: Send + Sync {
    /// List every application in an organization
    async fn get_applications(&self, org_id: &str) -> Result<Vec<RegistryApplication>>;

    /// Create an application and attach its source-control metadata.
    ///
    /// Returns the new application ID only when both the create and the
    /// source-control call succeed. When the second call fails the remote
    /// record is left behind unlinked; the failure is reported, not hidden.
    async fn create_application(
        &self,
        name: &str,
        repo_url: &str,
        branch: &str,
        org_id: &str,
    ) -> Result<String>;

    /// Trigger a source-control evaluation for an application
    async fn trigger_scan(&self, app_id: &str, branch: &str, stage_id: &str) -> Result<()>;

    /// Delete an application
    async fn delete_application(&self, app_id: &str) -> Result<()>;
}

/// Operations against the Azure DevOps project host
#[async_trait]
pub trait ProjectHost: Send + Sync {
    /// List all projects visible to the caller (single page)
    async fn get_projects(&self) -> Result<Vec<RemoteProject>>;

    /// Remote URL of the project's first repository, `Ok(None)` when the
    /// project has no repositories
    async fn get_repo_url(&self, project_id: &str) -> Result<Option<String>>;
}

/// Repository discovery via GitHub search
#[async_trait]
pub trait RepoSearch: Send + Sync {
    /// Login of the authenticated user
    async fn current_login(&self) -> Result<String>;

    /// Repositories of `login` whose name contains `term` (single page)
    async fn search_repositories(&self, term: &str, login: &str) -> Result<Vec<RemoteRepo>>;
}
